use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Application root not found at {path} {location}")]
    AppRootNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to spawn worker process {program}: {source} {location}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Backend did not become ready after {attempts} attempts {location}")]
    HealthProbeTimeout {
        attempts: u32,
        location: ErrorLocation,
    },

    #[error("Maximum restart attempts ({max}) exceeded {location}")]
    MaxRestartsExceeded { max: u32, location: ErrorLocation },

    #[error("HTTP client error: {source} {location}")]
    Client {
        #[source]
        source: jasper_client::ClientError,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::ProcessSpawn {
            program: program.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn probe_timeout(attempts: u32) -> Self {
        Self::HealthProbeTimeout {
            attempts,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn max_restarts(max: u32) -> Self {
        Self::MaxRestartsExceeded {
            max,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether this error is recoverable via retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HealthProbeTimeout { .. } => true,
            Self::Client { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::AppRootNotFound { .. } => {
                "The backend files could not be found. \
                   Set backend.app_root in config.toml or reinstall Jasper."
            }
            Self::ProcessSpawn { .. } => {
                "No usable Python interpreter was found. \
                   Install Python 3 or create a venv next to the backend."
            }
            Self::HealthProbeTimeout { .. } => {
                "The backend is taking too long to start. \
                   Models may still be loading; the app will connect once it is up."
            }
            Self::MaxRestartsExceeded { .. } => {
                "The backend keeps crashing. \
                   Check the worker output in the logs."
            }
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<jasper_client::ClientError> for SupervisorError {
    #[track_caller]
    fn from(source: jasper_client::ClientError) -> Self {
        Self::Client {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
