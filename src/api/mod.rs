//! # Remote sync layer
//!
//! Typed access to the time-tracking REST API. Every request goes through
//! [`ApiClient::request_json`] / [`ApiClient::request_unit`], which attach the
//! bearer token, apply the uniform timeout and classify the outcome:
//!
//! | Outcome | Error |
//! |---------|-------|
//! | transport failure / timeout | [`AppError::Network`] |
//! | HTTP 401 | [`AppError::Unauthorized`] |
//! | HTTP 403 | [`AppError::Forbidden`] |
//! | other non-2xx | [`AppError::Api`] |
//! | body not matching its schema | [`AppError::Validation`] ("invalid response format") |
//!
//! No retry is attempted.

pub mod auth;
pub mod cache;
pub mod gate;
pub mod time_records;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;
use zeroize::Zeroizing;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::user::MessageResponse;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    bearer: Option<Zeroizing<String>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid api_base_url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "api_base_url must be http(s), got '{base_url}'"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(format!("client init: {e}")))?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            timeout,
            bearer: None,
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::new(&cfg.api_base_url, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token attached to every subsequent request.
    pub fn set_bearer(&mut self, token: Option<&str>) {
        self.bearer = token.map(|t| Zeroizing::new(t.to_string()));
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub fn time_records(&self) -> time_records::TimeRecordsApi<'_> {
        time_records::TimeRecordsApi::new(self)
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.bearer {
            req = req.bearer_auth(token.as_str());
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        req
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> AppResult<(String, Vec<u8>)> {
        let endpoint = format!("{} {}", method, path);
        tracing::debug!(%endpoint, "sending request");

        let resp = self
            .build(method, path, query, body)
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::info!(%endpoint, "server rejected credentials (401)");
                return Err(AppError::Unauthorized);
            }
            StatusCode::FORBIDDEN => {
                tracing::info!(%endpoint, "access forbidden (403)");
                return Err(AppError::Forbidden);
            }
            _ => {}
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        if !status.is_success() {
            let message = error_message(&bytes, status);
            tracing::warn!(%endpoint, status = status.as_u16(), "request failed: {message}");
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok((endpoint, bytes.to_vec()))
    }

    /// Send a request and decode its JSON body into `T`.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> AppResult<T> {
        let (endpoint, bytes) = self.execute(method, path, query, body).await?;
        decode(&endpoint, &bytes)
    }

    /// Send a request whose response body carries nothing the client needs.
    pub(crate) async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> AppResult<()> {
        self.execute(method, path, &[], body).await.map(|_| ())
    }

    fn transport_error(&self, endpoint: &str, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            tracing::warn!(%endpoint, "request timed out after {:?}", self.timeout);
            AppError::Network(format!(
                "{endpoint} timed out after {}s",
                self.timeout.as_secs_f32()
            ))
        } else {
            tracing::warn!(%endpoint, "transport error: {e}");
            AppError::Network(format!("{endpoint}: {e}"))
        }
    }
}

/// Decode a response body, mapping any schema mismatch to the fixed
/// "invalid response format" validation error.
fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> AppResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!(%endpoint, "response did not match schema: {e}");
        AppError::invalid_response()
    })
}

/// Extract a human readable message from an error response body.
fn error_message(bytes: &[u8], status: StatusCode) -> String {
    if let Ok(m) = serde_json::from_slice::<MessageResponse>(bytes)
        && !m.message.trim().is_empty()
    {
        return m.message;
    }
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    }
}
