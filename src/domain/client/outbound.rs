use std::error::Error as StdError;

use snafu::prelude::*;

pub use crate::domain::daemon::inbound::{QueryResponse, ReminderStatus};
use crate::domain::entity::ReminderKind;

/// A public port for launching a daemon in the background.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StartPort: Send + Sync + 'static {
    /// Do the start operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if a daemon is already running or
    /// launching it failed.
    async fn start(&self) -> Result<(), StartDaemonError>;
}

/// An error type of launching a daemon.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum StartDaemonError {
    #[snafu(display("Daemon is already running"))]
    AlreadyRunning,
    #[snafu(display("Daemon exited abnormally"))]
    Exited,
    #[snafu(whatever, display("Start failed: {message}"))]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

/// A public port for sending requests to a running daemon. A `kind` of
/// `None` addresses every reminder.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DaemonPort: Send + Sync + 'static {
    async fn pause(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError>;

    async fn resume(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError>;

    async fn skip(&self, kind: ReminderKind) -> Result<(), RequestDaemonError>;

    /// Fetch the state of every reminder.
    async fn query(&self) -> Result<QueryResponse, RequestDaemonError>;

    /// Show a reminder right away without touching its timer. The daemon
    /// picks the first enabled reminder when `kind` is `None`.
    async fn test(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError>;

    /// Make the daemon re-read its configuration.
    async fn reload(&self) -> Result<(), RequestDaemonError>;
}

/// An error type of sending requests to daemon.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum RequestDaemonError {
    #[snafu(display("Daemon is not running at {endpoint}, try `breather start`"))]
    Unavailable { endpoint: String },
    #[snafu(display("Could not receive a valid response"))]
    BadResponse,
    #[snafu(display("Daemon rejected the request: {message}"))]
    Rejected { message: String },
    #[snafu(whatever, display("Request failed: {message}"))]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}
