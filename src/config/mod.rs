use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};
use crate::models::location::LocationType;
use crate::utils::path::expand_tilde;

pub mod migrate;

/// Uniform request timeout applied to every API call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "TIMECLOCK_HOME";
/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "TIMECLOCK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: i64,
    #[serde(default = "default_location")]
    pub default_location: String,
    #[serde(default = "default_terminal")]
    pub terminal: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_session_timeout() -> i64 {
    DEFAULT_SESSION_TIMEOUT_MINUTES
}
fn default_location() -> String {
    LocationType::Office.as_api_str().to_string()
}
fn default_terminal() -> String {
    "cli".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            session_timeout_minutes: default_session_timeout(),
            default_location: default_location(),
            terminal: default_terminal(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV) {
            return expand_tilde(&custom);
        }
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timeclock")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".timeclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timeclock.conf")
    }

    /// Return the default path of the client storage database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timeclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// `TIMECLOCK_API_URL` overrides the configured API base URL.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            cfg.api_base_url = url;
        }

        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn default_location_type(&self) -> AppResult<LocationType> {
        LocationType::from_code(&self.default_location)
            .ok_or_else(|| AppError::InvalidLocation(self.default_location.clone()))
    }

    /// Initialize the configuration file. Returns the database path.
    pub fn init_all(custom_db: Option<String>, api_url: Option<String>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            api_base_url: api_url.unwrap_or_else(default_api_base_url),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config.database)
    }
}
