use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Duration, Instant};

use crate::domain::daemon::outbound::{DeliverPort, DeliveryRequest, MessagePort, MessageRequest};
use crate::domain::daemon::worker::routine::Event;
use crate::domain::entity::{AppSettings, ReminderKind};
use crate::tracing_report;

/// Minimum spacing between two deliveries caused by timer fires.
pub const COALESCING_GAP: Duration = Duration::from_secs(120);

/// Keeps track of the most recent delivery slot shared by all reminder kinds.
#[derive(Debug, Default)]
pub struct DeliveryGate {
    last: Option<Instant>,
}

impl DeliveryGate {
    /// Creates a new [`DeliveryGate`] that has not seen any delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how long a delivery firing at `now` has to wait, and holds the
    /// resulting slot so that the next fire is spaced after it.
    pub fn reserve(&mut self, now: Instant) -> Duration {
        let delay = match self.last {
            Some(last) => (last + COALESCING_GAP).saturating_duration_since(now),
            None => Duration::ZERO,
        };
        self.last = Some(now + delay);
        delay
    }

    /// Note that a delivery really happened at `at`.
    pub fn record(&mut self, at: Instant) {
        self.last = Some(self.last.map_or(at, |last| last.max(at)));
    }

    pub fn last(&self) -> Option<Instant> {
        self.last
    }
}

/// Collaborators a delivery pipeline talks to.
#[derive(Clone)]
pub struct Pipeline {
    pub message: Arc<dyn MessagePort>,
    pub deliver: Arc<dyn DeliverPort>,
    pub events: UnboundedSender<Event>,
}

impl Pipeline {
    /// Run the delivery of `kind` on a background task: wait `delay`, build
    /// the message, report the delivery instant and hand it to the sink.
    ///
    /// The task is detached. Pausing `kind` afterwards does not cancel it.
    pub fn dispatch(&self, kind: ReminderKind, delay: Duration, settings: Arc<AppSettings>) {
        let pipeline = self.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tracing::debug!(%kind, delay = delay.as_secs(), "delivery delayed");
                tokio::time::sleep(delay).await;
            }
            pipeline.run(kind, &settings).await;
        });
    }

    async fn run(&self, kind: ReminderKind, settings: &AppSettings) {
        let request = MessageRequest {
            kind,
            tone: settings.generation.tone,
            prompt: settings.generation.prompt.clone(),
            generation_enabled: settings.generation.enabled,
        };
        let mut message = self.message.generate(request).await;

        if let Some(fact) = settings.append_fact.then(|| kind.random_fact()).flatten() {
            message.push_str("\n\n");
            message.push_str(fact);
        }

        // The scheduler outlives every pipeline it spawns.
        let _ = self.events.send(Event::Delivered {
            kind,
            at: Instant::now(),
        });

        let request = DeliveryRequest {
            kind,
            message,
            mode: settings.reminder(kind).display,
            play_sound: settings.play_sounds,
            dismiss_seconds: settings.banner_dismiss_seconds,
        };

        match self.deliver.deliver(request).await {
            Ok(()) => tracing::info!(%kind, "reminder delivered"),
            Err(err) => {
                tracing_report!(err);
            }
        }
    }
}
