use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::nav::View;
use crate::ui::messages::success;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Notes { id, text } = cmd {
        let mut ctx = AppContext::open(cfg.clone(), View::Protocol)?;
        let entry = ctx.update_notes(*id, text.trim()).await?;
        success(format!(
            "Notes of booking #{} ({} {} {}) updated.",
            entry.id,
            entry.date_str(),
            entry.time_str(),
            entry.record_type.label()
        ));
    }
    Ok(())
}
