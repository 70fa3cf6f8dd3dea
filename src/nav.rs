//! Navigation state of the client: which view is active and where to go
//! after the next successful login.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Signup,
    Dashboard,
    Protocol,
    Unauthorized,
    Forbidden,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Signup => "/signup",
            View::Dashboard => "/dashboard",
            View::Protocol => "/protocol",
            View::Unauthorized => "/unauthorized",
            View::Forbidden => "/forbidden",
        }
    }

    /// Views reachable without a session. A 401 seen while one of them is
    /// active does not trigger a redirect.
    pub fn is_auth_view(&self) -> bool {
        matches!(self, View::Login | View::Signup | View::Unauthorized)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: View,
    attempted_path: Option<String>,
}

impl Navigator {
    pub fn new(current: View) -> Self {
        Self {
            current,
            attempted_path: None,
        }
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn navigate(&mut self, to: View) {
        tracing::debug!(from = %self.current, to = %to, "navigate");
        self.current = to;
    }

    /// Leave the current view for `to`, remembering the current path so it
    /// can be restored after login.
    pub fn redirect_from_current(&mut self, to: View) -> String {
        let attempted = self.current.path().to_string();
        self.attempted_path = Some(attempted.clone());
        self.navigate(to);
        attempted
    }

    pub fn attempted_path(&self) -> Option<&str> {
        self.attempted_path.as_deref()
    }
}
