use std::sync::Arc;

use snafu::prelude::*;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Sender as OneshotSender};
use tokio::time::Duration;

use crate::domain::entity::{AppSettings, ReminderInterval, ReminderKind, TimerStatus};

/// State of one reminder at the moment of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSnapshot {
    pub kind: ReminderKind,
    pub status: TimerStatus,
    pub interval: Option<ReminderInterval>,
    pub remaining: Option<Duration>,
}

/// State of every reminder, in catalog order, plus the derived global pause
/// flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    pub paused: bool,
    pub reminders: Vec<ReminderSnapshot>,
}

/// Actions that a [`SchedulerRoutine`] runs.
///
/// [`SchedulerRoutine`]: super::routine::SchedulerRoutine
#[derive(Debug)]
pub enum Command {
    Configure {
        settings: Arc<AppSettings>,
    },
    Pause {
        kind: ReminderKind,
    },
    Resume {
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    },
    PauseAll,
    ResumeAll {
        settings: Arc<AppSettings>,
    },
    Skip {
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    },
    Test {
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    },
    TimeRemaining {
        kind: ReminderKind,
        responder: OneshotSender<Option<Duration>>,
    },
    IsPaused {
        kind: Option<ReminderKind>,
        responder: OneshotSender<bool>,
    },
    Snapshot {
        responder: OneshotSender<SchedulerSnapshot>,
    },
}

/// Handle that controls a [`SchedulerRoutine`]. Cloning it is cheap; the
/// routine stops once every handle is dropped.
///
/// [`SchedulerRoutine`]: super::routine::SchedulerRoutine
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    requester: Sender<Command>,
}

impl SchedulerHandle {
    /// Creates a new [`SchedulerHandle`].
    pub fn new(requester: Sender<Command>) -> Self {
        Self { requester }
    }

    /// Start, restart or stop timers so that they match `settings`.
    pub async fn configure(&self, settings: Arc<AppSettings>) -> Result<(), SchedulerError> {
        self.send(Command::Configure { settings }).await
    }

    /// Suspend the countdown of `kind`.
    pub async fn pause(&self, kind: ReminderKind) -> Result<(), SchedulerError> {
        self.send(Command::Pause { kind }).await
    }

    /// Continue the countdown of `kind` where it was paused.
    pub async fn resume(
        &self,
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    ) -> Result<(), SchedulerError> {
        self.send(Command::Resume { kind, settings }).await
    }

    pub async fn pause_all(&self) -> Result<(), SchedulerError> {
        self.send(Command::PauseAll).await
    }

    pub async fn resume_all(&self, settings: Arc<AppSettings>) -> Result<(), SchedulerError> {
        self.send(Command::ResumeAll { settings }).await
    }

    /// Throw away the running countdown of `kind` and start a full one.
    pub async fn skip_next(
        &self,
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    ) -> Result<(), SchedulerError> {
        self.send(Command::Skip { kind, settings }).await
    }

    /// Deliver a reminder of `kind` now, ignoring timers and coalescing.
    pub async fn trigger_test(
        &self,
        kind: ReminderKind,
        settings: Arc<AppSettings>,
    ) -> Result<(), SchedulerError> {
        self.send(Command::Test { kind, settings }).await
    }

    pub async fn time_remaining(
        &self,
        kind: ReminderKind,
    ) -> Result<Option<Duration>, SchedulerError> {
        self.ask(|responder| Command::TimeRemaining { kind, responder })
            .await
    }

    pub async fn is_paused(&self, kind: ReminderKind) -> Result<bool, SchedulerError> {
        self.ask(|responder| Command::IsPaused {
            kind: Some(kind),
            responder,
        })
        .await
    }

    /// Returns `true` if at least one timer is live and all live timers are
    /// paused.
    pub async fn is_all_paused(&self) -> Result<bool, SchedulerError> {
        self.ask(|responder| Command::IsPaused {
            kind: None,
            responder,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, SchedulerError> {
        self.ask(|responder| Command::Snapshot { responder }).await
    }

    async fn send(&self, command: Command) -> Result<(), SchedulerError> {
        self.requester
            .send(command)
            .await
            .map_err(|_| SchedulerError::Stopped)
    }

    async fn ask<T, F>(&self, command: F) -> Result<T, SchedulerError>
    where
        F: FnOnce(OneshotSender<T>) -> Command,
    {
        let (responder, receiver) = oneshot::channel();
        self.send(command(responder)).await?;
        receiver.await.map_err(|_| SchedulerError::Stopped)
    }
}

/// An error type of talking to the background scheduler.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchedulerError {
    #[snafu(display("Scheduler should be running but has shut down"))]
    Stopped,
}
