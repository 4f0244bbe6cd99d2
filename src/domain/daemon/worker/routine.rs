use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use crate::domain::daemon::outbound::{DeliverPort, MessagePort};
use crate::domain::daemon::worker::delivery::{DeliveryGate, Pipeline};
use crate::domain::daemon::worker::handle::{Command, ReminderSnapshot, SchedulerSnapshot};
use crate::domain::daemon::worker::state::TimerTable;
use crate::domain::entity::{AppSettings, ReminderKind};

/// Notifications sent back to the [`SchedulerRoutine`] by the tasks it
/// spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A timer of `kind` reached its deadline.
    Fire { kind: ReminderKind, epoch: u64 },
    /// A delivery pipeline handed a reminder to the sink at `at`.
    Delivered { kind: ReminderKind, at: Instant },
}

/// A [`SchedulerContext`] stores the channels and collaborators of the
/// [`SchedulerRoutine`].
pub struct SchedulerContext {
    pub commands: Receiver<Command>,
    pub events: UnboundedReceiver<Event>,
    pub pipeline: Pipeline,
}

/// The single owner of every timer. A [`SchedulerRoutine`] runs on
/// background, receiving [`Command`]s from [`SchedulerHandle`]s and
/// [`Event`]s from its own timers and pipelines, one at a time.
///
/// [`SchedulerHandle`]: super::handle::SchedulerHandle
pub struct SchedulerRoutine {
    context: SchedulerContext,
    table: TimerTable,
    gate: DeliveryGate,
    settings: Arc<AppSettings>,
}

impl SchedulerRoutine {
    /// Spawn a running [`SchedulerRoutine`] on background. Every timer starts
    /// stopped until the first [`Command::Configure`].
    pub fn spawn(
        commands: Receiver<Command>,
        message: Arc<dyn MessagePort>,
        deliver: Arc<dyn DeliverPort>,
    ) -> JoinHandle<()> {
        let (sender, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut routine = Self {
                context: SchedulerContext {
                    commands,
                    events,
                    pipeline: Pipeline {
                        message,
                        deliver,
                        events: sender.clone(),
                    },
                },
                table: TimerTable::new(sender),
                gate: DeliveryGate::new(),
                settings: Arc::new(AppSettings::default()),
            };
            routine.run().await;
        })
    }

    async fn run(&mut self) {
        loop {
            tokio::select! {
                command = self.context.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.context.events.recv() => self.handle_event(event),
            }
        }

        self.table.stop_all();
        tracing::debug!("scheduler stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let now = Instant::now();

        match command {
            Command::Configure { settings } => self.handle_configure(settings, now),
            Command::Pause { kind } => self.handle_pause(kind, now),
            Command::Resume { kind, settings } => {
                self.settings = settings;
                self.handle_resume(kind, now);
            }
            Command::PauseAll => {
                for kind in ReminderKind::ALL {
                    self.handle_pause(kind, now);
                }
            }
            Command::ResumeAll { settings } => {
                self.settings = settings;
                for kind in ReminderKind::ALL {
                    self.handle_resume(kind, now);
                }
            }
            Command::Skip { kind, settings } => {
                self.settings = settings;
                if self.table.skip(kind, now) {
                    tracing::info!(%kind, "reminder skipped");
                }
            }
            Command::Test { kind, settings } => {
                self.settings = settings;
                tracing::info!(%kind, "test reminder requested");
                self.context
                    .pipeline
                    .dispatch(kind, Duration::ZERO, self.settings.clone());
            }
            Command::TimeRemaining { kind, responder } => {
                let _ = responder.send(self.table.remaining(kind, now));
            }
            Command::IsPaused { kind, responder } => {
                let paused = match kind {
                    Some(kind) => self.table.is_paused(kind),
                    None => self.table.is_all_paused(),
                };
                let _ = responder.send(paused);
            }
            Command::Snapshot { responder } => {
                let _ = responder.send(self.snapshot(now));
            }
        }
    }

    fn handle_configure(&mut self, settings: Arc<AppSettings>, now: Instant) {
        let plan = self.table.plan(&settings);
        tracing::info!(stop = ?plan.stop, start = ?plan.start, "reminders configured");
        self.table.apply(&plan, now);
        self.settings = settings;
    }

    fn handle_pause(&mut self, kind: ReminderKind, now: Instant) {
        if self.table.pause(kind, now) {
            tracing::info!(%kind, "reminder paused");
        }
    }

    fn handle_resume(&mut self, kind: ReminderKind, now: Instant) {
        if self.table.resume(kind, now) {
            tracing::info!(%kind, "reminder resumed");
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Fire { kind, epoch } => {
                let now = Instant::now();
                if !self.table.fire(kind, epoch, now) {
                    tracing::debug!(%kind, epoch, "stale timer fire ignored");
                    return;
                }

                let delay = self.gate.reserve(now);
                tracing::info!(%kind, delay = delay.as_secs(), "reminder fired");
                self.context
                    .pipeline
                    .dispatch(kind, delay, self.settings.clone());
            }
            Event::Delivered { at, .. } => self.gate.record(at),
        }
    }

    fn snapshot(&self, now: Instant) -> SchedulerSnapshot {
        SchedulerSnapshot {
            paused: self.table.is_all_paused(),
            reminders: ReminderKind::ALL
                .into_iter()
                .map(|kind| ReminderSnapshot {
                    kind,
                    status: self.table.status(kind),
                    interval: self.table.interval(kind),
                    remaining: self.table.remaining(kind, now),
                })
                .collect(),
        }
    }
}
