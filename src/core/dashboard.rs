use crate::api::time_records::CurrentStatus;
use crate::models::today_summary::TodaySummary;
use crate::utils::colors::{self, color_for_flex, colorize_optional};
use crate::utils::formatting::{bold, describe_status, hm2readable, pad_right};
use crate::utils::time::duration_to_minutes;
use crate::workstatus::WorkStatusStore;
use crate::workstatus::machine::allowed_intents;

const LABEL_W: usize = 12;

pub struct DashboardView;

impl DashboardView {
    /// Lines describing today's summary, without trailing newline.
    pub fn render(summary: &TodaySummary) -> Vec<String> {
        let arrival = summary.arrival_time.as_deref().unwrap_or("--:--");
        let departure = summary.departure_time.as_deref().unwrap_or("--:--");

        let flex_color = duration_to_minutes(&summary.flex_time)
            .map(color_for_flex)
            .unwrap_or(colors::RESET);

        vec![
            format!("{}{}", pad_right("Status", LABEL_W), describe_status(summary.status)),
            format!("{}{}", pad_right("Arrival", LABEL_W), colorize_optional(arrival)),
            format!("{}{}", pad_right("Departure", LABEL_W), colorize_optional(departure)),
            format!(
                "{}{}",
                pad_right("Break", LABEL_W),
                colorize_optional(&hm2readable(&summary.break_time))
            ),
            format!(
                "{}{}",
                pad_right("Worked", LABEL_W),
                colorize_optional(&hm2readable(&summary.working_time))
            ),
            format!(
                "{}{}{}{}",
                pad_right("Flex", LABEL_W),
                flex_color,
                hm2readable(&summary.flex_time),
                colors::RESET
            ),
        ]
    }

    /// Lines describing the server's current status.
    pub fn render_current(current: &CurrentStatus) -> Vec<String> {
        let last = match (&current.last_record_type, &current.last_record_time) {
            (Some(rt), Some(t)) => format!("{} at {}", rt.label(), t),
            (Some(rt), None) => rt.label().to_string(),
            _ => "--".to_string(),
        };
        vec![
            format!("{}{}", pad_right("Status", LABEL_W), describe_status(current.status)),
            format!("{}{}", pad_right("Last", LABEL_W), colorize_optional(&last)),
        ]
    }

    pub fn print(store: &WorkStatusStore) {
        match store.day() {
            Some(day) => println!("{}\n", bold(&format!("📅 {}", day.format("%A %Y-%m-%d")))),
            None => println!("{}\n", bold("📅 No bookings yet")),
        }

        for line in Self::render(store.summary()) {
            println!("{line}");
        }

        let pending = store.pending_local();
        if pending > 0 {
            println!(
                "\n{}{} booking(s) not yet confirmed by the server{}",
                colors::YELLOW,
                pending,
                colors::RESET
            );
        }

        let next: Vec<&str> = allowed_intents(store.status())
            .iter()
            .map(|i| i.command_hint())
            .collect();
        if !next.is_empty() {
            println!("\n{}Next:{} {}", colors::GREY, colors::RESET, next.join(", "));
        }
    }
}
