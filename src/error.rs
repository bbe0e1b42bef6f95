//! Error types for the agent dashboard

use thiserror::Error;

/// Dashboard Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Dashboard Error type
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("Failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Failed to {operation}: {}{}", status_text(.status), body_suffix(.body))]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was JSON but not the structure the operation expects.
    #[error("Failed to {operation}: API response is not {expected}")]
    Shape {
        operation: &'static str,
        expected: &'static str,
    },

    #[error("Failed to {operation}: invalid response body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// HTTP status of a `Status` error, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_text(status: &reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("{} Unknown error", status.as_u16()),
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}
