use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use super::user::User;

/// Authentication state of the client.
///
/// Custom `Debug` implementation redacts the token to keep it out of log
/// output; the token is wiped from memory on drop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub login_time: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub session_timeout_minutes: i64,
}

impl Session {
    pub fn anonymous(session_timeout_minutes: i64) -> Self {
        Self {
            token: None,
            user: None,
            is_authenticated: false,
            login_time: None,
            last_activity: None,
            session_timeout_minutes,
        }
    }

    pub fn established(
        token: String,
        user: User,
        now: DateTime<Utc>,
        session_timeout_minutes: i64,
    ) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            is_authenticated: true,
            login_time: Some(now),
            last_activity: Some(now),
            session_timeout_minutes,
        }
    }

    pub fn full_name(&self) -> Option<String> {
        self.user.as_ref().map(User::full_name)
    }

    /// True once the inactivity window has elapsed since the last activity.
    pub fn is_idle(&self, now: DateTime<Utc>) -> bool {
        if self.session_timeout_minutes <= 0 {
            return false;
        }
        match self.last_activity {
            Some(last) => now - last > chrono::Duration::minutes(self.session_timeout_minutes),
            None => false,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("is_authenticated", &self.is_authenticated)
            .field("login_time", &self.login_time)
            .field("last_activity", &self.last_activity)
            .field("session_timeout_minutes", &self.session_timeout_minutes)
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(token) = self.token.as_mut() {
            token.zeroize();
        }
    }
}
