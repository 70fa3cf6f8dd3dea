//! Authorization gate: the single place where API results are inspected
//! for 401/403 before they reach the caller.

use crate::db::log::ttlog_quiet;
use crate::db::storage::{KvStore, REDIRECT_KEY, WORK_STATUS_KEY};
use crate::errors::{AppError, AppResult};
use crate::nav::{Navigator, View};
use crate::session::SessionStore;

/// What the gate did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    Passed,
    SessionCleared { redirected_from: Option<String> },
    Forbidden,
}

pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Inspect `result`. The result itself is returned unchanged; only the
    /// session, navigation and durable storage are affected.
    pub fn inspect<T>(
        result: AppResult<T>,
        session: &mut SessionStore,
        navigator: &mut Navigator,
        storage: &KvStore,
    ) -> (AppResult<T>, GateAction) {
        let action = match &result {
            Err(AppError::Unauthorized) => Self::on_unauthorized(session, navigator, storage),
            Err(AppError::Forbidden) => {
                ttlog_quiet(storage.conn(), "gate", "403", "Redirected to forbidden view");
                navigator.navigate(View::Forbidden);
                GateAction::Forbidden
            }
            _ => GateAction::Passed,
        };
        (result, action)
    }

    fn on_unauthorized(
        session: &mut SessionStore,
        navigator: &mut Navigator,
        storage: &KvStore,
    ) -> GateAction {
        if let Err(e) = session.clear(storage) {
            tracing::warn!("failed to clear stored session: {e}");
        }
        if let Err(e) = storage.remove(WORK_STATUS_KEY) {
            tracing::warn!("failed to clear work-status snapshot: {e}");
        }

        if navigator.current().is_auth_view() {
            ttlog_quiet(storage.conn(), "gate", "401", "Session cleared");
            return GateAction::SessionCleared {
                redirected_from: None,
            };
        }

        let attempted = navigator.redirect_from_current(View::Unauthorized);
        if let Err(e) = storage.set(REDIRECT_KEY, &attempted) {
            tracing::warn!("failed to store post-login redirect: {e}");
        }
        ttlog_quiet(
            storage.conn(),
            "gate",
            "401",
            &format!("Session cleared, redirected from {attempted}"),
        );

        GateAction::SessionCleared {
            redirected_from: Some(attempted),
        }
    }
}
