use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::protocol::ProtocolView;
use crate::errors::{AppError, AppResult};
use crate::nav::View;
use crate::ui::messages::{header, info};
use crate::utils::date;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Protocol { today, period } = cmd {
        let mut ctx = AppContext::open(cfg.clone(), View::Protocol)?;

        if *today {
            let work = ctx.refresh_today().await?;
            header(format!("Protocol {}", date::today()));
            let entries = work.protocol_oldest_first();
            if entries.is_empty() {
                info("No bookings today.");
            } else {
                print!("{}", ProtocolView::render(entries));
            }
            return Ok(());
        }

        let (start, end) = match period {
            Some(p) => date::resolve_range(p).map_err(AppError::InvalidDate)?,
            None => date::current_month_bounds().map_err(AppError::InvalidDate)?,
        };

        let entries = ctx.my_records(start, end).await?;
        header(format!("Protocol {start} → {end}"));
        if entries.is_empty() {
            info("No bookings in this period.");
        } else {
            print!("{}", ProtocolView::render(&entries));
            println!("{} booking(s)", entries.len());
        }
    }
    Ok(())
}
