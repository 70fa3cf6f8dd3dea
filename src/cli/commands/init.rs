use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::storage::KvStore;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the client storage database and its migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.api.clone(), cli.test)?;
    let path = Config::config_file();

    println!("⚙️  Initializing timeclock…");
    println!("📄 Config file : {}", path.display());
    println!("🗄️  Storage    : {}", &db_path);

    let store = KvStore::open(&db_path)?;

    println!("✅ Storage initialized at {}", &db_path);

    if let Err(e) = log::ttlog(
        store.conn(),
        "init",
        "",
        &format!("Storage initialized at {}", &db_path),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 timeclock initialization completed! Next: timeclock login --email <you>");
    Ok(())
}
