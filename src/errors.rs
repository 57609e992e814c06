use axum::{http::StatusCode, response::{IntoResponse, Response}};
use reqwest::Error;
use std::fmt;

/// Errors raised while building the expiry rule set. Fatal at startup.
///
/// `index` is the zero-based position of the directive in the `expires` block.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("directive #{index}: empty directive")]
    EmptyDirective { index: usize },

    #[error("directive #{index}: unknown directive '{keyword}', expected 'match' or 'match_header'")]
    UnknownDirective { index: usize, keyword: String },

    #[error("directive #{index}: '{keyword}' takes {expected} arguments, got {found}")]
    ArgumentCount {
        index: usize,
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("directive #{index}: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("directive #{index}: invalid header name '{name}'")]
    InvalidHeaderName { index: usize, name: String },
}

impl ConfigError {
    /// Position of the offending directive.
    pub fn index(&self) -> usize {
        match self {
            ConfigError::EmptyDirective { index }
            | ConfigError::UnknownDirective { index, .. }
            | ConfigError::ArgumentCount { index, .. }
            | ConfigError::InvalidPattern { index, .. }
            | ConfigError::InvalidHeaderName { index, .. } => *index,
        }
    }

    // Rule constructors know nothing about directive positions; the builder
    // stamps the position on the way out.
    pub(crate) fn at(mut self, position: usize) -> Self {
        match &mut self {
            ConfigError::EmptyDirective { index }
            | ConfigError::UnknownDirective { index, .. }
            | ConfigError::ArgumentCount { index, .. }
            | ConfigError::InvalidPattern { index, .. }
            | ConfigError::InvalidHeaderName { index, .. } => *index = position,
        }
        self
    }
}

/// Request-time failures of the backend behind the expiry layer.
#[derive(Debug)]
pub enum AppError {
    ProxyError(Error),
    InvalidDestination(String),
    RequestTooLarge,
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ProxyError(e) => {
                tracing::error!("Proxy error: {}", e);
                (StatusCode::BAD_GATEWAY, "Error proxying request".to_string())
            }
            AppError::InvalidDestination(url) => {
                tracing::error!("Invalid upstream URL: {}", url);
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid upstream destination".to_string(),
                )
            }
            AppError::RequestTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
            ),
        };

        (status, error_message).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::ProxyError(error)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ProxyError(_) => write!(f, "Proxy error"),
            AppError::InvalidDestination(url) => write!(f, "Invalid destination: {}", url),
            AppError::RequestTooLarge => write!(f, "Request too large"),
            AppError::InternalServerError => write!(f, "Internal server error"),
        }
    }
}
