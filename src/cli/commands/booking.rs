use crate::app::AppContext;
use crate::cli::parser::{BreakAction, Commands};
use crate::config::Config;
use crate::core::dashboard::DashboardView;
use crate::errors::{AppError, AppResult};
use crate::models::location::LocationType;
use crate::nav::View;
use crate::ui::messages::{success, warning};
use crate::workstatus::machine::Intent;

fn parse_location(loc: &Option<String>) -> AppResult<Option<LocationType>> {
    match loc {
        Some(code) => LocationType::from_code(code)
            .map(Some)
            .ok_or_else(|| AppError::InvalidLocation(code.clone())),
        None => Ok(None),
    }
}

/// Map a booking command to its intent, location and notes.
fn booking_of(cmd: &Commands) -> Option<(Intent, &Option<String>, &Option<String>)> {
    match cmd {
        Commands::In { loc, notes } => Some((Intent::ClockIn, loc, notes)),
        Commands::Out { loc, notes } => Some((Intent::ClockOut, loc, notes)),
        Commands::Break { action, loc, notes } => {
            let intent = match action {
                BreakAction::Start => Intent::StartBreak,
                BreakAction::End => Intent::EndBreak,
            };
            Some((intent, loc, notes))
        }
        _ => None,
    }
}

/// Handle `in`, `out` and `break start|end`
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Some((intent, loc, notes)) = booking_of(cmd) else {
        return Ok(());
    };

    // Reject bad input before touching the session or the network
    let location = parse_location(loc)?;
    let notes = notes
        .as_ref()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let mut ctx = AppContext::open(cfg.clone(), View::Dashboard)?;
    let outcome = ctx.book(intent, location, notes).await?;

    success(format!(
        "{} at {} ({})",
        outcome.entry.record_type.label(),
        outcome.entry.time_str(),
        outcome.entry.location_type.label()
    ));
    if let Some(e) = &outcome.refetch_error {
        warning(format!("Booking stored, but today's view could not be refreshed: {e}"));
    }
    println!();
    DashboardView::print(ctx.work());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_actions_map_to_intents() {
        let cmd = Commands::Break {
            action: BreakAction::End,
            loc: None,
            notes: None,
        };
        let (intent, _, _) = booking_of(&cmd).unwrap();
        assert_eq!(intent, Intent::EndBreak);
    }

    #[test]
    fn unknown_location_is_rejected() {
        assert!(matches!(
            parse_location(&Some("beach".into())),
            Err(AppError::InvalidLocation(_))
        ));
        assert_eq!(
            parse_location(&Some("h".into())).unwrap(),
            Some(LocationType::Home)
        );
    }
}
