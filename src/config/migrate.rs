//! Configuration file upgrades: detect keys missing from the YAML file and
//! write their defaults back, recording the change in the internal log.

use rusqlite::Connection;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};

use super::Config;

/// Keys every configuration file is expected to carry.
pub const EXPECTED_KEYS: [&str; 6] = [
    "database",
    "api_base_url",
    "timeout_secs",
    "session_timeout_minutes",
    "default_location",
    "terminal",
];

fn read_mapping(conf_file: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(conf_file)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse {}: {}", conf_file.display(), e)))?;
    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            conf_file.display()
        ))),
    }
}

/// Return the expected keys absent from the configuration file.
pub fn missing_keys(conf_file: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(conf_file)?;
    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add the missing keys with their effective values (defaults for absent
/// keys). Returns the keys that were written.
pub fn fill_missing_keys(conf_file: &Path, effective: &Config) -> AppResult<Vec<&'static str>> {
    let mut map = read_mapping(conf_file)?;
    let missing = missing_keys(conf_file)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let full = match serde_yaml::to_value(effective).map_err(|e| AppError::Config(e.to_string()))? {
        Value::Mapping(m) => m,
        _ => return Err(AppError::Config("configuration did not serialize to a mapping".into())),
    };

    for key in &missing {
        let k = Value::String((*key).to_string());
        if let Some(v) = full.get(&k) {
            map.insert(k, v.clone());
        }
    }

    let serialized =
        serde_yaml::to_string(&Value::Mapping(map)).map_err(|e| AppError::Config(e.to_string()))?;
    fs::write(conf_file, serialized)?;
    Ok(missing)
}

/// Run the config upgrade and log it when something changed.
pub fn run_config_migration(conn: &Connection, effective: &Config) -> AppResult<Vec<&'static str>> {
    let conf_file = Config::config_file();
    if !conf_file.exists() {
        return Ok(Vec::new());
    }

    let added = fill_missing_keys(&conf_file, effective)?;
    if !added.is_empty() {
        ttlog(conn, "config_migrated", "config", &format!("Added keys: {}", added.join(", ")))?;
    }
    Ok(added)
}
