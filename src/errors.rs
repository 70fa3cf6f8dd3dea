//! Unified application error type.
//! All modules (api, session, workstatus, db, cli) return AppError to keep
//! the error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

use crate::models::work_status::WorkStatus;
use crate::workstatus::machine::Intent;

/// Fixed message surfaced when a response body does not match its schema.
pub const INVALID_RESPONSE_FORMAT: &str = "invalid response format";

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Storage encoding error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // API boundary
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authorized: the session is missing or has expired")]
    Unauthorized,

    #[error("Access forbidden")]
    Forbidden,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected by server ({status}): {message}")]
    Api { status: u16, message: String },

    // ---------------------------
    // Local logic
    // ---------------------------
    #[error("Not logged in. Run `timeclock login` first.")]
    NotAuthenticated,

    #[error("Cannot {} while status is '{from}'", .intent.action_label())]
    InvalidTransition { from: WorkStatus, intent: Intent },

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

/// Coarse classification of an [`AppError`], mirroring how the client
/// reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Forbidden,
    Network,
    Business,
    Local,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Unauthorized | AppError::NotAuthenticated => ErrorKind::Auth,
            AppError::Forbidden => ErrorKind::Forbidden,
            AppError::Network(_) => ErrorKind::Network,
            AppError::Api { .. } | AppError::InvalidTransition { .. } => ErrorKind::Business,
            _ => ErrorKind::Local,
        }
    }

    pub fn invalid_response() -> Self {
        AppError::Validation(INVALID_RESPONSE_FORMAT.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
