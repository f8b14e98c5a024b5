//! Error handling for the SaaS kit client

use std::fmt;
use reqwest::StatusCode;
use thiserror::Error;

/// Broad classification of a failure, derived from HTTP status codes at the
/// transport boundary. Consumers dispatch on this instead of inspecting
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401/403 — the session is invalid or the caller lacks access
    Unauthorized,
    /// 404 — the addressed entity does not exist
    NotFound,
    /// 400/422 — the server rejected the request payload
    Validation,
    /// The request never produced an HTTP response
    Network,
    /// Anything else, including `success: false` envelopes on 2xx responses
    Unknown,
}

impl ErrorKind {
    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Unauthorized,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
            _ => ErrorKind::Unknown,
        }
    }
}

/// Unified error type for the SaaS kit client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Errors reported by the backend API
    #[error("{message}")]
    Api {
        kind: ErrorKind,
        status: Option<StatusCode>,
        message: String,
    },

    /// Authentication errors raised client-side (e.g. no active session)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Client-side validation errors, raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create an API error, classifying it from the response status
    pub fn api<T: fmt::Display>(status: StatusCode, msg: T) -> Self {
        Error::Api {
            kind: ErrorKind::from_status(status),
            status: Some(status),
            message: msg.to_string(),
        }
    }

    /// Create an API error for a well-formed response that reported failure
    pub fn api_failure<T: fmt::Display>(msg: T) -> Self {
        Error::Api {
            kind: ErrorKind::Unknown,
            status: None,
            message: msg.to_string(),
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new client-side validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Api { kind, .. } => *kind,
            Error::Http(err) => match err.status() {
                Some(status) => ErrorKind::from_status(status),
                None => ErrorKind::Network,
            },
            Error::Auth(_) => ErrorKind::Unauthorized,
            Error::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Unknown,
        }
    }
}
