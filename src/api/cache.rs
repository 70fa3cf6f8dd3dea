//! Tag-based query cache.
//!
//! Query results are stored under their cache key together with the
//! resource tags they depend on. A successful mutation invalidates its tags:
//! matching entries turn stale and the keys of active subscriptions are
//! handed back so the caller can refetch them.

use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use crate::models::record_type::RecordType;

/// Resource categories used for invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    TimeRecord,
    Dashboard,
    MyTimeRecord,
    Auth,
    User,
}

/// Read-only requests the client issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Today,
    SummaryToday,
    CurrentStatus,
    MyRecords { start: NaiveDate, end: NaiveDate },
    Me,
}

impl Query {
    pub fn key(&self) -> String {
        match self {
            Query::Today => "GET /timetrack/time-records/today".into(),
            Query::SummaryToday => "GET /timetrack/summary/today".into(),
            Query::CurrentStatus => "GET /timetrack/status/current".into(),
            Query::MyRecords { start, end } => format!(
                "GET /timetrack/time-records/my-records?startDate={}&endDate={}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            Query::Me => "GET /auth/me".into(),
        }
    }

    pub fn tags(&self) -> &'static [Tag] {
        match self {
            Query::Today => &[Tag::TimeRecord],
            Query::SummaryToday | Query::CurrentStatus => &[Tag::Dashboard],
            Query::MyRecords { .. } => &[Tag::MyTimeRecord, Tag::TimeRecord],
            Query::Me => &[Tag::Auth, Tag::User],
        }
    }
}

/// State-changing requests and the tags they invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Booking(RecordType),
    UpdateNotes,
    DeleteRecord,
    Login,
    Logout,
}

impl Mutation {
    pub fn invalidates(&self) -> &'static [Tag] {
        match self {
            Mutation::Booking(_) => &[Tag::TimeRecord, Tag::Dashboard, Tag::MyTimeRecord],
            Mutation::UpdateNotes | Mutation::DeleteRecord => &[Tag::TimeRecord, Tag::MyTimeRecord],
            Mutation::Login | Mutation::Logout => &[Tag::Auth, Tag::User],
        }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    tags: &'static [Tag],
    stale: bool,
    fetched_at: Instant,
}

pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    subscriptions: HashMap<String, Query>,
    max_age: Duration,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .field("subscriptions", &self.subscriptions.keys().collect::<Vec<_>>())
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl QueryCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            subscriptions: HashMap::new(),
            max_age,
        }
    }

    /// Fresh cached value for `query`, if any.
    pub fn get<T: DeserializeOwned>(&self, query: &Query) -> Option<T> {
        let entry = self.entries.get(&query.key())?;
        if entry.stale || entry.fetched_at.elapsed() > self.max_age {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn put<T: Serialize>(&mut self, query: &Query, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.entries.insert(
                    query.key(),
                    CacheEntry {
                        value: v,
                        tags: query.tags(),
                        stale: false,
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(e) => tracing::warn!(key = %query.key(), "not caching value: {e}"),
        }
    }

    pub fn is_stale(&self, query: &Query) -> bool {
        self.entries
            .get(&query.key())
            .map(|e| e.stale)
            .unwrap_or(true)
    }

    /// Mark `query` as watched: it is refetched whenever one of its tags is
    /// invalidated.
    pub fn subscribe(&mut self, query: Query) {
        self.subscriptions.insert(query.key(), query);
    }

    pub fn unsubscribe(&mut self, query: &Query) {
        self.subscriptions.remove(&query.key());
    }

    /// Mark every entry carrying one of `tags` as stale. Returns the
    /// subscribed queries that need a refetch.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<Query> {
        let wanted: HashSet<Tag> = tags.iter().copied().collect();
        let mut hit = Vec::new();

        for (key, entry) in self.entries.iter_mut() {
            if entry.tags.iter().any(|t| wanted.contains(t)) {
                entry.stale = true;
                hit.push(key.clone());
            }
        }

        let mut refetch: Vec<Query> = self
            .subscriptions
            .values()
            .filter(|q| q.tags().iter().any(|t| wanted.contains(t)))
            .cloned()
            .collect();
        refetch.sort_by_key(Query::key);

        tracing::debug!(?tags, stale = hit.len(), refetch = refetch.len(), "cache invalidated");
        refetch
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.subscriptions.clear();
    }
}
