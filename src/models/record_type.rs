use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of booking stored in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    ClockIn,
    ClockOut,
    BreakStart,
    BreakEnd,
}

impl RecordType {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            RecordType::ClockIn => "CLOCK_IN",
            RecordType::ClockOut => "CLOCK_OUT",
            RecordType::BreakStart => "BREAK_START",
            RecordType::BreakEnd => "BREAK_END",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "CLOCK_IN" => Some(RecordType::ClockIn),
            "CLOCK_OUT" => Some(RecordType::ClockOut),
            "BREAK_START" => Some(RecordType::BreakStart),
            "BREAK_END" => Some(RecordType::BreakEnd),
            _ => None,
        }
    }

    /// Path segment of the booking endpoint
    /// (`/timetrack/time-records/time-bookings/{segment}`).
    pub fn booking_path(&self) -> &'static str {
        match self {
            RecordType::ClockIn => "clock-in",
            RecordType::ClockOut => "clock-out",
            RecordType::BreakStart => "break-start",
            RecordType::BreakEnd => "break-end",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordType::ClockIn => "Clock in",
            RecordType::ClockOut => "Clock out",
            RecordType::BreakStart => "Break start",
            RecordType::BreakEnd => "Break end",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, RecordType::ClockIn | RecordType::BreakEnd)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}
