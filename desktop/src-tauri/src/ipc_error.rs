use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("Failed to read {path}: {source} {location}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("File dialog failed: {message} {location}")]
    Dialog {
        message: String,
        location: ErrorLocation,
    },
}

impl IpcError {
    #[track_caller]
    pub fn read_file(path: PathBuf, source: std::io::Error) -> Self {
        Self::ReadFile {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn dialog<S: Into<String>>(message: S) -> Self {
        Self::Dialog {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => {
                "The file could not be read as text. \
                   Check that it exists and is UTF-8 encoded."
            }
            Self::Dialog { .. } => "The file dialog could not be shown. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, IpcError>;
