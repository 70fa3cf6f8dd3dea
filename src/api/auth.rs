//! Authentication endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/auth/signin` | Log in, returns token + user |
//! | POST   | `/auth/signup` | Register a new employee |
//! | POST   | `/auth/logout` | Invalidate the token server-side |
//! | GET    | `/auth/me`     | Current user |

use reqwest::Method;

use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::user::{AuthResponse, Credentials, MessageResponse, SignupRequest, User};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn signin(&self, credentials: &Credentials) -> AppResult<AuthResponse> {
        validate_credentials(credentials)?;
        let body = serde_json::to_value(credentials)?;
        let resp: AuthResponse = self
            .client
            .request_json(Method::POST, "/auth/signin", &[], Some(&body))
            .await?;
        if resp.token.trim().is_empty() {
            return Err(AppError::invalid_response());
        }
        Ok(resp)
    }

    pub async fn signup(&self, request: &SignupRequest) -> AppResult<MessageResponse> {
        validate_credentials(&Credentials {
            email: request.email.clone(),
            password: request.password.clone(),
        })?;
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(AppError::Validation("first and last name are required".into()));
        }
        let body = serde_json::to_value(request)?;
        self.client
            .request_json(Method::POST, "/auth/signup", &[], Some(&body))
            .await
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.client
            .request_unit(Method::POST, "/auth/logout", None)
            .await
    }

    pub async fn me(&self) -> AppResult<User> {
        self.client
            .request_json(Method::GET, "/auth/me", &[], None)
            .await
    }
}

/// Local schema check on the sign-in body, run before any request is built.
pub fn validate_credentials(credentials: &Credentials) -> AppResult<()> {
    let email = credentials.email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(user, domain)| !user.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::Validation(format!("invalid email address '{email}'")));
    }
    if credentials.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}
