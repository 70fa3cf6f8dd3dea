//! Today's work status: the summary shown on the dashboard plus the list
//! of bookings, updated optimistically on every intent and replaced by the
//! server's view once it has been refetched.

pub mod machine;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::location::LocationType;
use crate::models::protocol_entry::{EntryId, ProtocolEntry};
use crate::models::today_summary::TodaySummary;
use crate::models::work_status::WorkStatus;
use machine::{Intent, InvalidTransition, transition};

/// Compensation record of one optimistic booking: everything needed to
/// take it back if the server rejects it.
#[derive(Debug, Clone)]
pub struct Booking {
    pub intent: Intent,
    pub entry: ProtocolEntry,
    previous_summary: TodaySummary,
    previous_day: Option<NaiveDate>,
    superseded_protocol: Option<Vec<ProtocolEntry>>,
}

impl Booking {
    pub fn entry_id(&self) -> &EntryId {
        &self.entry.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatusStore {
    day: Option<NaiveDate>,
    summary: TodaySummary,
    /// Newest first.
    protocol: Vec<ProtocolEntry>,
}

impl WorkStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn summary(&self) -> &TodaySummary {
        &self.summary
    }

    pub fn status(&self) -> WorkStatus {
        self.summary.status
    }

    pub fn protocol(&self) -> &[ProtocolEntry] {
        &self.protocol
    }

    /// Bookings in chronological order, as displayed.
    pub fn protocol_oldest_first(&self) -> Vec<&ProtocolEntry> {
        let mut out: Vec<&ProtocolEntry> = self.protocol.iter().collect();
        out.sort_by_key(|e| e.timestamp());
        out
    }

    /// Number of bookings not yet confirmed by a refetch.
    pub fn pending_local(&self) -> usize {
        self.protocol.iter().filter(|e| e.is_local()).count()
    }

    /// Apply `intent` locally at `now`.
    ///
    /// Updates status and flags, keeps the first arrival of the day,
    /// prepends a locally identified entry and returns the compensation
    /// record. The store is left untouched when the transition is rejected.
    pub fn apply(
        &mut self,
        intent: Intent,
        location: LocationType,
        terminal: &str,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<Booking, InvalidTransition> {
        let today = now.date();
        let rolled_over = self.day.is_some_and(|d| d != today);
        let status_today = if rolled_over {
            WorkStatus::NotStarted
        } else {
            self.summary.status
        };

        let next = transition(status_today, intent)?;

        let previous_summary = self.summary.clone();
        let previous_day = self.day;
        let superseded_protocol = if rolled_over {
            tracing::debug!(?previous_day, %today, "day rollover, starting a fresh summary");
            self.summary = TodaySummary::default();
            Some(std::mem::take(&mut self.protocol))
        } else {
            None
        };
        self.day = Some(today);

        let hm = now.format("%H:%M").to_string();
        match intent {
            Intent::ClockIn => {
                if self.summary.arrival_time.is_none() {
                    self.summary.arrival_time = Some(hm);
                }
                self.summary.departure_time = None;
            }
            Intent::ClockOut => self.summary.departure_time = Some(hm),
            Intent::StartBreak | Intent::EndBreak => {}
        }
        self.summary.set_status(next);

        let entry = ProtocolEntry::local(now, intent.record_type(), location, terminal, notes);
        self.protocol.insert(0, entry.clone());

        Ok(Booking {
            intent,
            entry,
            previous_summary,
            previous_day,
            superseded_protocol,
        })
    }

    /// Take back an optimistic booking: restore the summary it replaced
    /// and remove the entry it inserted.
    pub fn undo(&mut self, booking: Booking) {
        self.protocol.retain(|e| e.id != booking.entry.id);
        if let Some(mut old) = booking.superseded_protocol {
            old.extend(std::mem::take(&mut self.protocol));
            self.protocol = old;
        }
        self.summary = booking.previous_summary;
        self.day = booking.previous_day;
    }

    /// Replace the summary with the server's.
    pub fn replace_summary(&mut self, summary: TodaySummary, today: NaiveDate) {
        self.summary = summary;
        self.day = Some(today);
    }

    /// Replace the whole protocol with the server's list. Locally
    /// synthesized entries are dropped, not matched by id.
    pub fn replace_protocol(&mut self, mut entries: Vec<ProtocolEntry>, today: NaiveDate) {
        let dropped = self.pending_local();
        if dropped > 0 {
            tracing::debug!(dropped, "replacing optimistic entries with server protocol");
        }
        entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp()));
        self.protocol = entries;
        self.day = Some(today);
    }

    pub fn reconcile(&mut self, summary: TodaySummary, entries: Vec<ProtocolEntry>, today: NaiveDate) {
        self.replace_summary(summary, today);
        self.replace_protocol(entries, today);
    }

    /// Drop an entry (after the server confirmed its deletion).
    pub fn remove_entry(&mut self, id: &EntryId) -> bool {
        let before = self.protocol.len();
        self.protocol.retain(|e| &e.id != id);
        before != self.protocol.len()
    }

    /// Swap in an updated version of an entry, matched by id, or insert it
    /// at its place in the newest-first list. Entries of another day than
    /// the snapshot's are ignored.
    pub fn upsert_entry(&mut self, entry: ProtocolEntry) -> bool {
        if self.day != Some(entry.date) {
            return false;
        }
        match self.protocol.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => {
                let at = self
                    .protocol
                    .iter()
                    .position(|e| e.timestamp() < entry.timestamp())
                    .unwrap_or(self.protocol.len());
                self.protocol.insert(at, entry);
            }
        }
        true
    }
}
