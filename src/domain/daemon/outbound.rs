use std::error::Error as StdError;

use snafu::prelude::*;

use crate::domain::entity::{DisplayMode, ReminderKind, Tone};

/// A public port producing the text of a reminder. Implementations never
/// fail: when generation is impossible they fall back to catalog messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MessagePort: Send + Sync + 'static {
    /// Produce a message for `request.kind`.
    async fn generate(&self, request: MessageRequest) -> String;
}

/// Options forwarded to a [`MessagePort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub kind: ReminderKind,
    pub tone: Tone,
    pub prompt: String,
    pub generation_enabled: bool,
}

/// A public port presenting a reminder to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DeliverPort: Send + Sync + 'static {
    /// Present the reminder.
    ///
    /// # Errors
    ///
    /// This function will return an error if the reminder could not be shown.
    async fn deliver(&self, request: DeliveryRequest) -> Result<(), DeliverError>;
}

/// A structure that stores everything needed to present a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub kind: ReminderKind,
    pub message: String,
    pub mode: DisplayMode,
    pub play_sound: bool,
    pub dismiss_seconds: u32,
}

/// An error type of the delivery operation.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DeliverError {
    #[snafu(whatever, display("Could not deliver a reminder: {message}"))]
    Unknown {
        message: String,
        #[snafu(source(from(Box<dyn StdError + Send + Sync>, Some)))]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}
