use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::PageInvariantError;

/// Coarse classification of an [`ApiError`], used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NotFound,
    Conflict,
    Unauthorized,
    InvalidInput,
    Other,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Transport => "Could not reach the library service.",
            Self::NotFound => "The requested book could not be found.",
            Self::Conflict => "This book is already in the library.",
            Self::Unauthorized => "You need to log in to do that.",
            Self::InvalidInput => "The request was not valid.",
            Self::Other => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("not found ({endpoint}): {message}")]
    NotFound { endpoint: String, message: String },

    #[error("conflict ({endpoint}): {message}")]
    Conflict { endpoint: String, message: String },

    #[error("not authorized ({status}) for {endpoint}")]
    Unauthorized {
        endpoint: String,
        status: StatusCode,
    },

    #[error("backend error ({status}) for {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: StatusCode,
        message: String,
    },

    #[error("decode response from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid page from backend: {0}")]
    InvalidPage(#[from] PageInvariantError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// Maps a non-success response onto the error taxonomy.
    pub fn from_status(endpoint: impl Into<String>, status: StatusCode, raw_body: &str) -> Self {
        let endpoint = endpoint.into();
        let message = parse_error_message(raw_body).unwrap_or_else(|| raw_body.trim().to_owned());
        match status {
            StatusCode::NOT_FOUND => Self::NotFound { endpoint, message },
            StatusCode::CONFLICT => Self::Conflict { endpoint, message },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized { endpoint, status }
            }
            _ => Self::Status {
                endpoint,
                status,
                message,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidArgument(_) => ErrorKind::InvalidInput,
            Self::Status { .. } | Self::Decode { .. } | Self::InvalidPage(_) => ErrorKind::Other,
        }
    }
}

// Backend `ExceptionResponse`; every field is optional on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionBody {
    error: Option<String>,
    business_error_description: Option<String>,
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let body: ExceptionBody = serde_json::from_str(raw_json).ok()?;
    body.error
        .or(body.business_error_description)
        .filter(|message| !message.trim().is_empty())
}
