use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;
use rusqlite::Connection;

const OP_MAX_W: usize = 60;

/// ANSI colour for an operation name
fn color_for_operation(op: &str) -> Colour {
    match op {
        "book" | "login" | "signup" => Colour::Green,
        "book_failed" | "delete" => Colour::Red,
        "notes" => Colour::Yellow,
        "gate" | "logout" => Colour::Blue,
        "migration_applied" | "config_migrated" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(row: &LogRow) -> String {
    if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    }
}

/// Colour the operation word, truncating the visible text to `OP_MAX_W`.
fn render_op(row: &LogRow) -> String {
    let color = color_for_operation(&row.operation);
    let visible = op_target(row);
    let visible = if visible.chars().count() > OP_MAX_W {
        let mut s: String = visible.chars().take(OP_MAX_W - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(rows: &[LogRow]) -> Vec<String> {
        let op_w = rows
            .iter()
            .map(|r| op_target(r).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_MAX_W);
        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);

        rows.iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| r.date.clone());
                let op = render_op(r);
                let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).chars().count()));
                format!(
                    "{:>id_w$}: {} | {}{} => {}",
                    r.id, date, op, padding, r.message,
                    id_w = id_w
                )
            })
            .collect()
    }

    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let rows = load_log(conn)?;

        println!("📜 Internal log:\n");
        if rows.is_empty() {
            println!("(empty)");
            return Ok(());
        }

        for line in Self::render(&rows) {
            println!("{line}");
        }
        Ok(())
    }
}
