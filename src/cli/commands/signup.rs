use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::user::SignupRequest;
use crate::nav::View;
use crate::ui::messages::{info, success};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Signup {
        email,
        password,
        first_name,
        last_name,
    } = cmd
    {
        let mut ctx = AppContext::open(cfg.clone(), View::Signup)?;
        let request = SignupRequest {
            email: email.trim().to_string(),
            password: password.clone(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        };

        let message = ctx.signup(&request).await?;
        if message.is_empty() {
            success(format!("Account created for {}.", request.email));
        } else {
            success(message);
        }
        info(format!("Log in with: timeclock login --email {}", request.email));
    }
    Ok(())
}
