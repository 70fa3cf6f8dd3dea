use serde::{Deserialize, Serialize};
use std::fmt;

/// Today's work status as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkStatus {
    #[default]
    #[serde(rename = "Not Started", alias = "NOT_STARTED")]
    NotStarted,
    #[serde(alias = "WORKING")]
    Working,
    #[serde(alias = "BREAK", alias = "ON_BREAK")]
    Break,
    #[serde(alias = "FINISHED")]
    Finished,
}

impl WorkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::NotStarted => "Not Started",
            WorkStatus::Working => "Working",
            WorkStatus::Break => "Break",
            WorkStatus::Finished => "Finished",
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, WorkStatus::Working)
    }

    pub fn is_on_break(&self) -> bool {
        matches!(self, WorkStatus::Break)
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
