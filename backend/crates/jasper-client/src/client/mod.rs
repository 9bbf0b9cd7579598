pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod models;
pub(crate) mod retry;

pub use client::ApiClient;
pub use error::{ClientError, Result as ClientResult};
