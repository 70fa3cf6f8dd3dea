use crate::app::AppContext;
use crate::config::Config;
use crate::errors::AppResult;
use crate::nav::View;
use crate::ui::messages::{info, success};

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let mut ctx = AppContext::open(cfg.clone(), View::Dashboard)?;
    if ctx.session().token.is_none() {
        info("Not logged in.");
        return Ok(());
    }

    ctx.logout().await?;
    success("Logged out.");
    Ok(())
}
