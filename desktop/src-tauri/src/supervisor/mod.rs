mod backend_status;
mod error;
mod health;
mod lifecycle;
mod liveness;
mod locator;
mod worker_exit;
mod worker_state;

pub use backend_status::BackendStatus;
pub use error::{Result as SupervisorResult, SupervisorError};
pub use health::{HealthProbe, ReadinessState};
pub use lifecycle::ProcessSupervisor;
pub use liveness::{LivenessMonitor, StatusSink};
pub(crate) use locator::resolve_app_root_from;
pub use locator::{
    InterpreterLocator, InterpreterSource, ResolveLaunch, WorkerLaunch, resolve_app_root,
};
pub use worker_exit::WorkerExit;
pub use worker_state::WorkerState;
