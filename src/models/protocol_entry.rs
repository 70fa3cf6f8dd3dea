use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use std::fmt;

use super::{location::LocationType, record_type::RecordType};
use crate::utils::time::serde_hm;

/// Prefix of identifiers synthesized on the client for optimistic entries.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Identifier of a protocol entry: either assigned by the server or
/// generated locally for an optimistic insert. Only `local-` prefixed
/// strings are local; numeric strings are server ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EntryId {
    Server(i64),
    Local(String),
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(d)? {
            Raw::Number(id) => Ok(EntryId::Server(id)),
            Raw::Text(s) if s.starts_with(LOCAL_ID_PREFIX) => Ok(EntryId::Local(s)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(EntryId::Server)
                .map_err(|_| D::Error::custom(format!("invalid entry id: {s}"))),
        }
    }
}

impl EntryId {
    pub fn new_local() -> Self {
        EntryId::Local(format!("{}{}", LOCAL_ID_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, EntryId::Local(_))
    }

    pub fn server_id(&self) -> Option<i64> {
        match self {
            EntryId::Server(id) => Some(*id),
            EntryId::Local(_) => None,
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Server(id) => write!(f, "{}", id),
            EntryId::Local(id) => f.write_str(id),
        }
    }
}

/// One booking in the daily protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    #[serde(with = "serde_hm")]
    pub time: NaiveTime,
    pub record_type: RecordType,
    pub location_type: LocationType,
    #[serde(default)]
    pub terminal: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ProtocolEntry {
    /// Build an entry synthesized on the client at `now`, with a fresh
    /// local identifier.
    pub fn local(
        now: NaiveDateTime,
        record_type: RecordType,
        location_type: LocationType,
        terminal: &str,
        notes: Option<String>,
    ) -> Self {
        let stamp = now
            .and_local_timezone(Local)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| now.format("%Y-%m-%dT%H:%M:%S").to_string());

        Self {
            id: EntryId::new_local(),
            date: now.date(),
            time: now.time(),
            record_type,
            location_type,
            terminal: Some(terminal.to_string()),
            notes,
            is_manual: false,
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        }
    }

    pub fn is_local(&self) -> bool {
        self.id.is_local()
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}
