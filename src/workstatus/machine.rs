//! Transition table of today's work status.
//!
//! ```text
//! NotStarted --ClockIn--> Working --StartBreak--> Break
//!                           ^  |                   |
//!                           |  +<----EndBreak------+
//!                           |  |                   |
//!                  ClockIn  |  ClockOut         ClockOut
//!                           |  v                   v
//!                          Finished <--------------+
//! ```
//!
//! Anything not drawn above is rejected with [`InvalidTransition`].

use std::fmt;

use crate::errors::AppError;
use crate::models::record_type::RecordType;
use crate::models::work_status::WorkStatus;

/// A user intent that books one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    ClockIn,
    StartBreak,
    EndBreak,
    ClockOut,
}

impl Intent {
    pub fn record_type(&self) -> RecordType {
        match self {
            Intent::ClockIn => RecordType::ClockIn,
            Intent::StartBreak => RecordType::BreakStart,
            Intent::EndBreak => RecordType::BreakEnd,
            Intent::ClockOut => RecordType::ClockOut,
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            Intent::ClockIn => "clock in",
            Intent::StartBreak => "start a break",
            Intent::EndBreak => "end a break",
            Intent::ClockOut => "clock out",
        }
    }

    /// CLI invocation that books this intent.
    pub fn command_hint(&self) -> &'static str {
        match self {
            Intent::ClockIn => "timeclock in",
            Intent::StartBreak => "timeclock break start",
            Intent::EndBreak => "timeclock break end",
            Intent::ClockOut => "timeclock out",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: WorkStatus,
    pub intent: Intent,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} while status is '{}'", self.intent, self.from)
    }
}

impl std::error::Error for InvalidTransition {}

impl From<InvalidTransition> for AppError {
    fn from(t: InvalidTransition) -> Self {
        AppError::InvalidTransition {
            from: t.from,
            intent: t.intent,
        }
    }
}

/// Next status after `intent`, or the rejected pair.
pub fn transition(from: WorkStatus, intent: Intent) -> Result<WorkStatus, InvalidTransition> {
    use Intent::*;
    use WorkStatus::*;

    match (from, intent) {
        (NotStarted, ClockIn) | (Finished, ClockIn) => Ok(Working),
        (Working, StartBreak) => Ok(Break),
        (Break, EndBreak) => Ok(Working),
        (Working, ClockOut) | (Break, ClockOut) => Ok(Finished),
        _ => Err(InvalidTransition { from, intent }),
    }
}

/// Intents accepted from `status`, in display order.
pub fn allowed_intents(status: WorkStatus) -> Vec<Intent> {
    [Intent::ClockIn, Intent::StartBreak, Intent::EndBreak, Intent::ClockOut]
        .into_iter()
        .filter(|i| transition(status, *i).is_ok())
        .collect()
}
