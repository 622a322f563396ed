// src/error.rs

use std::fmt;

use crate::api::appwrite::AppwriteError;

/// Crate-wide error type. Every message is safe to show to the user;
/// gateway operations log the technical detail before rewrapping.
#[derive(Debug)]
pub enum AppError {
    /// Expected outcome for lookups of deleted/unknown documents. Never logged.
    NotFound,
    /// Invalid credentials or an expired session.
    Auth(String),
    /// A required field was missing or malformed. Raised before any remote call.
    Validation(String),
    /// A serverless function reported execution failure.
    RemoteExecution(String),
    /// Transport-level failure (DNS, TLS, timeouts, connection reset).
    Network(String),
    /// A response did not match its expected schema.
    Parse(String),
    /// Any other backend API error.
    Api { status: u16, message: String },
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "not found"),
            AppError::Auth(m) => write!(f, "authentication failed: {m}"),
            AppError::Validation(m) => write!(f, "{m}"),
            AppError::RemoteExecution(m) => write!(f, "operation failed: {m}"),
            AppError::Network(m) => write!(f, "network error: {m}"),
            AppError::Parse(m) => write!(f, "unexpected response from server: {m}"),
            AppError::Api { status, message } => {
                write!(f, "server error (status {status}): {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<AppwriteError> for AppError {
    fn from(value: AppwriteError) -> Self {
        match value {
            AppwriteError::NotFound { .. } => AppError::NotFound,
            AppwriteError::Unauthorized { message } => AppError::Auth(message),
            AppwriteError::Http(e) => AppError::Network(e.to_string()),
            AppwriteError::InvalidResponse(m) => AppError::Parse(m),
            AppwriteError::Execution(m) => AppError::RemoteExecution(m),
            AppwriteError::Api {
                status, message, ..
            } => AppError::Api { status, message },
        }
    }
}
