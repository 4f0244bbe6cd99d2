use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::interval::TryNewReminderIntervalError;
use crate::domain::entity::{AppSettings, ReminderKind};

/// An abstract interface for accessing the user's settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync + 'static {
    /// Get the current settings.
    ///
    /// # Errors
    ///
    /// This function will return an error if the settings could not be read
    /// or contain invalid values.
    async fn settings(&self) -> Result<AppSettings, GetSettingsError>;
}

/// An error type of accessing the repository of [`AppSettings`].
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum GetSettingsError {
    #[snafu(display("Invalid interval for reminder {kind}"))]
    #[non_exhaustive]
    InvalidInterval {
        kind: ReminderKind,
        source: TryNewReminderIntervalError,
    },
    #[snafu(whatever, display("Load settings failed: {message}"))]
    #[non_exhaustive]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}
