use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardView;
use crate::db::storage::{KvStore, WORK_STATUS_KEY};
use crate::errors::AppResult;
use crate::nav::View;
use crate::ui::messages::{hint, info};
use crate::workstatus::WorkStatusStore;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { offline, current } = cmd {
        if *offline {
            let store = KvStore::open(&cfg.database)?;
            match store.get::<WorkStatusStore>(WORK_STATUS_KEY)? {
                Some(work) => {
                    info("Offline snapshot (last known state):");
                    println!();
                    DashboardView::print(&work);
                }
                None => info("No stored snapshot yet."),
            }
            return Ok(());
        }

        let mut ctx = AppContext::open(cfg.clone(), View::Dashboard)?;

        if *current {
            let status = ctx.current_status().await?;
            for line in DashboardView::render_current(&status) {
                println!("{line}");
            }
            return Ok(());
        }

        let work = ctx.refresh_today().await?;
        DashboardView::print(work);

        if let Some(user) = ctx.session().full_name() {
            hint(format!("Logged in as {user}"));
        }
    }
    Ok(())
}
