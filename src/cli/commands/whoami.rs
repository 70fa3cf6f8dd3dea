use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::nav::View;
use crate::ui::messages::hint;
use crate::utils::formatting::bold;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Whoami { refresh } = cmd {
        let mut ctx = AppContext::open(cfg.clone(), View::Dashboard)?;
        if !ctx.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }

        let user = if *refresh {
            ctx.me().await?
        } else {
            ctx.session()
                .user
                .clone()
                .ok_or(AppError::NotAuthenticated)?
        };

        println!("{} <{}>", bold(&user.full_name()), user.email);
        if !user.roles.is_empty() {
            hint(format!("Roles: {}", user.roles.join(", ")));
        }
        if let Some(at) = ctx.session().login_time {
            hint(format!("Logged in since {}", at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")));
        }
    }
    Ok(())
}
