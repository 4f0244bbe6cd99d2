use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use tokio::time::Duration;

use crate::domain::daemon::worker::SchedulerError;
use crate::domain::entity::{ReminderKind, TimerStatus};
use crate::domain::repository::GetSettingsError;

/// A public port for suspending one reminder, or all of them when `kind` is
/// `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PausePort: Send + Sync + 'static {
    /// Do the pause operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scheduler is unavailable.
    async fn pause(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError>;
}

/// A public port for resuming one reminder, or all of them when `kind` is
/// `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ResumePort: Send + Sync + 'static {
    /// Do the resume operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scheduler is unavailable.
    async fn resume(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError>;
}

/// A public port for restarting a reminder's countdown.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SkipPort: Send + Sync + 'static {
    /// Do the skipping operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scheduler is unavailable.
    async fn skip(&self, kind: ReminderKind) -> Result<(), HandleRequestError>;
}

/// A public port for querying the current state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QueryPort: Send + Sync + 'static {
    /// Do the query operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scheduler is unavailable.
    async fn query(&self) -> Result<QueryResponse, HandleRequestError>;
}

/// A public port for showing a reminder right away. Without a `kind` the first
/// enabled reminder in catalog order is shown.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TestPort: Send + Sync + 'static {
    /// Do the test delivery.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scheduler is unavailable or
    /// no `kind` is given while every reminder is disabled.
    async fn test(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError>;
}

/// A public port for re-reading the settings and reconfiguring the timers.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReloadPort: Send + Sync + 'static {
    /// Do the reload operation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the settings are invalid or the
    /// scheduler is unavailable.
    async fn reload(&self) -> Result<(), HandleRequestError>;
}

/// The state of this daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub paused: bool,
    pub reminders: Vec<ReminderStatus>,
}

/// The state of one reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStatus {
    pub kind: ReminderKind,
    pub status: TimerStatus,
    pub interval: Option<u64>,
    pub remaining: Option<Duration>,
}

/// An error type of handling requests from inbound adapters.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum HandleRequestError {
    #[snafu(display("Could not reach the scheduler"))]
    Scheduler { source: SchedulerError },
    #[snafu(display("Could not load settings"))]
    Settings { source: GetSettingsError },
    #[snafu(display("No reminder is enabled"))]
    NothingEnabled,
}
