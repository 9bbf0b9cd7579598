//! Python interpreter discovery.

use crate::supervisor::{SupervisorError, SupervisorResult};

use std::ffi::OsString;
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};

use error_location::ErrorLocation;
use tracing::{debug, info};

/// Virtualenv directories searched under the application root, in order.
const VENV_DIRS: [&str; 4] = ["venv", ".venv", "backend/venv", "backend/.venv"];

#[cfg(windows)]
const BUNDLED_INTERPRETER: &str = "python/python.exe";
#[cfg(not(windows))]
const BUNDLED_INTERPRETER: &str = "python/bin/python3";

#[cfg(windows)]
const VENV_INTERPRETER: &str = "Scripts/python.exe";
#[cfg(not(windows))]
const VENV_INTERPRETER: &str = "bin/python";

#[cfg(windows)]
const SYSTEM_INTERPRETER: &str = "python";
#[cfg(not(windows))]
const SYSTEM_INTERPRETER: &str = "python3";

/// Where the chosen interpreter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterSource {
    Bundled,
    Venv,
    System,
}

impl fmt::Display for InterpreterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::Venv => write!(f, "venv"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Everything needed to spawn one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerLaunch {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    pub source: InterpreterSource,
}

/// Produces the command line for the next worker spawn.
///
/// Resolved again on every spawn, so a venv created while the app runs is
/// picked up by the next restart.
pub trait ResolveLaunch: Send + Sync {
    fn resolve(&self) -> SupervisorResult<WorkerLaunch>;
}

/// Finds a Python interpreter for `<app_root>/<entry_script>`.
///
/// Search order:
/// 1. Runtime bundled under the resource directory
/// 2. A virtualenv under the application root
/// 3. The system interpreter on PATH
pub struct InterpreterLocator {
    app_root: PathBuf,
    resource_dir: Option<PathBuf>,
    entry_script: PathBuf,
}

impl InterpreterLocator {
    pub fn new(app_root: PathBuf, resource_dir: Option<PathBuf>, entry_script: &str) -> Self {
        Self {
            app_root,
            resource_dir,
            entry_script: PathBuf::from(entry_script),
        }
    }

    pub fn entry_script(&self) -> PathBuf {
        self.app_root.join(&self.entry_script)
    }

    /// Pick the interpreter, falling back to the system one.
    pub fn find_interpreter(&self) -> (PathBuf, InterpreterSource) {
        if let Some(resource_dir) = &self.resource_dir {
            let bundled = resource_dir.join(BUNDLED_INTERPRETER);
            if bundled.is_file() {
                return (bundled, InterpreterSource::Bundled);
            }
            debug!("No bundled interpreter at {}", bundled.display());
        }

        for dir in VENV_DIRS {
            let candidate = self.app_root.join(dir).join(VENV_INTERPRETER);
            if candidate.is_file() {
                return (candidate, InterpreterSource::Venv);
            }
        }

        (PathBuf::from(SYSTEM_INTERPRETER), InterpreterSource::System)
    }
}

impl ResolveLaunch for InterpreterLocator {
    fn resolve(&self) -> SupervisorResult<WorkerLaunch> {
        if !self.app_root.is_dir() {
            return Err(SupervisorError::AppRootNotFound {
                path: self.app_root.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (program, source) = self.find_interpreter();
        info!("Using {source} interpreter: {}", program.display());

        Ok(WorkerLaunch {
            program,
            args: vec![self.entry_script().into_os_string()],
            cwd: self.app_root.clone(),
            source,
        })
    }
}

/// Directory the entry script is resolved against.
///
/// Priority: `backend.app_root` config > workspace checkout holding the
/// entry script (debug builds) > resource directory > current directory.
pub fn resolve_app_root(
    configured: Option<&str>,
    resource_dir: Option<&Path>,
    entry_script: &str,
) -> PathBuf {
    let workspace_root = cfg!(debug_assertions)
        .then(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../.."));

    resolve_app_root_from(
        configured,
        workspace_root.as_deref(),
        resource_dir,
        entry_script,
    )
}

pub(crate) fn resolve_app_root_from(
    configured: Option<&str>,
    workspace_root: Option<&Path>,
    resource_dir: Option<&Path>,
    entry_script: &str,
) -> PathBuf {
    if let Some(root) = configured {
        return PathBuf::from(root);
    }

    // The Rust crates also live under backend/, so only the script itself counts
    if let Some(root) = workspace_root
        && root.join(entry_script).is_file()
    {
        return root.to_path_buf();
    }

    resource_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}
