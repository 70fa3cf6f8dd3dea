//! timeclock library root.
//! Exposes the CLI parser, the high-level run() function and the client
//! core: session store, work-status machine, API layer and authorization
//! gate.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod nav;
pub mod session;
pub mod ui;
pub mod utils;
pub mod workstatus;

use clap::Parser;
use cli::commands as cmd;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cmd::init::handle(cli),
        Commands::Config { .. } => cmd::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cmd::log::handle(&cli.command, cfg),
        Commands::Signup { .. } => cmd::signup::handle(&cli.command, cfg).await,
        Commands::Login { .. } => cmd::login::handle(&cli.command, cfg).await,
        Commands::Logout => cmd::logout::handle(cfg).await,
        Commands::Whoami { .. } => cmd::whoami::handle(&cli.command, cfg).await,
        Commands::In { .. } | Commands::Out { .. } | Commands::Break { .. } => {
            cmd::booking::handle(&cli.command, cfg).await
        }
        Commands::Status { .. } => cmd::status::handle(&cli.command, cfg).await,
        Commands::Protocol { .. } => cmd::protocol::handle(&cli.command, cfg).await,
        Commands::Notes { .. } => cmd::notes::handle(&cli.command, cfg).await,
        Commands::Delete { .. } => cmd::delete::handle(&cli.command, cfg).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(api) = &cli.api {
        cfg.api_base_url = api.clone();
    }

    tracing::debug!(database = %cfg.database, api = %cfg.api_base_url, "configuration loaded");

    dispatch(&cli, &cfg).await
}
