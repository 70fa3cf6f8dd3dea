//! Durable client storage: a small JSON key/value store on top of SQLite.
//! Holds the persisted session, the post-login redirect and the last
//! work-status snapshot.

use chrono::Local;
use rusqlite::{OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};

use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub const SESSION_KEY: &str = "session";
pub const REDIRECT_KEY: &str = "redirect_after_login";
pub const WORK_STATUS_KEY: &str = "work_status";

pub struct KvStore {
    pool: DbPool,
}

impl KvStore {
    /// Open the store at `path`, creating the schema if needed.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &rusqlite::Connection {
        &self.pool.conn
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let raw: Option<String> = self
            .pool
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.pool.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.pool.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Take a value out of the store.
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let value = self.get(key)?;
        if value.is_some() {
            self.remove(key)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_overwrite_remove() {
        let kv = KvStore::in_memory().unwrap();
        assert_eq!(kv.get::<String>("k").unwrap(), None);

        kv.set("k", &"one".to_string()).unwrap();
        kv.set("k", &"two".to_string()).unwrap();
        assert_eq!(kv.get::<String>("k").unwrap().as_deref(), Some("two"));

        assert_eq!(kv.take::<String>("k").unwrap().as_deref(), Some("two"));
        assert_eq!(kv.get::<String>("k").unwrap(), None);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite");
        let path = path.to_string_lossy().to_string();

        KvStore::open(&path).unwrap().set("n", &41_i64).unwrap();
        let kv = KvStore::open(&path).unwrap();
        assert_eq!(kv.get::<i64>("n").unwrap(), Some(41));
    }
}
