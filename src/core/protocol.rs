use crate::models::protocol_entry::ProtocolEntry;
use crate::utils::colors::{self, colorize_in_out};
use crate::utils::formatting::describe_location;
use crate::utils::table::{Column, Table};

pub struct ProtocolView;

impl ProtocolView {
    /// Render bookings as a table. Entries are expected oldest first.
    pub fn render<'a, I>(entries: I) -> String
    where
        I: IntoIterator<Item = &'a ProtocolEntry>,
    {
        let mut table = Table::new(vec![
            Column::new("ID", 10),
            Column::new("DATE", 10),
            Column::new("TIME", 5),
            Column::new("TYPE", 11),
            Column::new("LOCATION", 13),
            Column::new("TERM", 6),
            Column::new("NOTES", 0),
        ]);

        for e in entries {
            let id = if e.is_local() {
                format!("{}pending{}", colors::YELLOW, colors::RESET)
            } else {
                e.id.to_string()
            };
            let (loc, loc_color) = describe_location(e.location_type);
            let mut notes = e.notes.clone().unwrap_or_default();
            if e.is_manual {
                notes = format!("{}[manual]{} {}", colors::GREY, colors::RESET, notes);
            }

            table.add_row(vec![
                id,
                e.date_str(),
                e.time_str(),
                colorize_in_out(e.record_type.label(), e.record_type.is_in()),
                format!("{loc_color}{loc}{}", colors::RESET),
                e.terminal.clone().unwrap_or_default(),
                notes,
            ]);
        }

        table.render()
    }
}
