use serde::{Deserialize, Serialize};

use super::work_status::WorkStatus;

/// Placeholder duration used until the server delivers computed values.
pub const ZERO_DURATION: &str = "00:00";

fn zero_duration() -> String {
    ZERO_DURATION.to_string()
}

/// Dashboard summary of the current user's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default = "zero_duration")]
    pub break_time: String,
    #[serde(default = "zero_duration")]
    pub working_time: String,
    #[serde(default = "zero_duration")]
    pub flex_time: String,
    pub status: WorkStatus,
    #[serde(default)]
    pub is_working: bool,
    #[serde(default)]
    pub is_on_break: bool,
}

impl Default for TodaySummary {
    fn default() -> Self {
        Self {
            arrival_time: None,
            departure_time: None,
            break_time: zero_duration(),
            working_time: zero_duration(),
            flex_time: zero_duration(),
            status: WorkStatus::NotStarted,
            is_working: false,
            is_on_break: false,
        }
    }
}

impl TodaySummary {
    /// Set status and keep both flags in line with it.
    pub fn set_status(&mut self, status: WorkStatus) {
        self.status = status;
        self.is_working = status.is_working();
        self.is_on_break = status.is_on_break();
    }
}
