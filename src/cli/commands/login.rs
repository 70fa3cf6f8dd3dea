use crate::app::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::user::Credentials;
use crate::nav::View;
use crate::ui::messages::{hint, info, success};

use std::io::{self, BufRead, Write};

/// Read the password from stdin when it was not given on the command line.
fn read_password() -> AppResult<String> {
    eprint!("Password: ");
    let _ = io::stderr().flush();

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }
    Ok(password)
}

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { email, password } = cmd {
        let password = match password {
            Some(p) => p.clone(),
            None => read_password()?,
        };
        let credentials = Credentials {
            email: email.trim().to_string(),
            password,
        };

        let mut ctx = AppContext::open(cfg.clone(), View::Login)?;
        let outcome = ctx.login(&credentials).await?;

        success(format!("Welcome, {}!", outcome.full_name));
        if !outcome.roles.is_empty() {
            hint(format!("Roles: {}", outcome.roles.join(", ")));
        }
        if let Some(path) = outcome.redirect_to {
            info(format!("Your previous session expired while on {path}; run that command again."));
        }
    }
    Ok(())
}
