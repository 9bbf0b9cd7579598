use error_location::ErrorLocation;
use std::panic::Location;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during API calls
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (status: {status}) {location}")]
    Api {
        status: u16,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cannot read {path}: {source} {location}")]
    File {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Create an API error with location
    #[track_caller]
    pub fn api_error(status: u16, message: String) -> Self {
        ClientError::Api {
            status,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a validation error with location
    #[track_caller]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        ClientError::Validation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a local file error with location
    #[track_caller]
    pub fn file(path: &Path, source: std::io::Error) -> Self {
        ClientError::File {
            path: path.to_path_buf(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, 408, 429 and 5xx are transient. Malformed
    /// bodies and client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } => !source.is_decode() && !source.is_builder(),
            Self::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            Self::Json { .. } | Self::Validation { .. } | Self::File { .. } => false,
        }
    }

    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
