//! Formatting utilities used for CLI output.

use crate::models::location::LocationType;
use crate::models::work_status::WorkStatus;
use crate::utils::colors;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Render an `HH:MM` duration as `02h 25m`, keeping the sign.
pub fn hm2readable(hm: &str) -> String {
    match crate::utils::time::duration_to_minutes(hm) {
        Some(mins) => {
            let sign = if mins < 0 { "-" } else { "" };
            let m = mins.abs();
            format!("{}{:02}h {:02}m", sign, m / 60, m % 60)
        }
        None => hm.to_string(),
    }
}

/// Textual description and ANSI color of a booking location.
pub fn describe_location(loc: LocationType) -> (String, &'static str) {
    match loc {
        LocationType::Office => (loc.label().into(), colors::BLUE),
        LocationType::Home => (loc.label().into(), colors::CYAN),
        LocationType::BusinessTrip => (loc.label().into(), colors::MAGENTA),
        LocationType::ClientSite => (loc.label().into(), colors::YELLOW),
    }
}

pub fn describe_status(status: WorkStatus) -> String {
    let color = match status {
        WorkStatus::NotStarted => colors::GREY,
        WorkStatus::Working => colors::GREEN,
        WorkStatus::Break => colors::YELLOW,
        WorkStatus::Finished => colors::BLUE,
    };
    format!("{}{}{}", color, status.label(), colors::RESET)
}
