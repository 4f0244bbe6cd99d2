use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::daemon::worker::routine::Event;
use crate::domain::entity::ReminderKind;

/// A pending one-shot wake-up for one reminder. Dropping the guard cancels
/// the wake-up if it has not fired yet.
#[derive(Debug)]
pub struct TimerGuard {
    handle: JoinHandle<()>,
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sleep until `deadline` on a background task and then report
/// [`Event::Fire`] back to the scheduler.
pub fn arm(
    kind: ReminderKind,
    epoch: u64,
    deadline: Instant,
    events: UnboundedSender<Event>,
) -> TimerGuard {
    let handle = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        // The scheduler owns the receiver for its whole life.
        let _ = events.send(Event::Fire { kind, epoch });
    });
    TimerGuard { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc;
    use tokio::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn timer_fires_at_deadline() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let start = Instant::now();
        let _guard = arm(
            ReminderKind::Posture,
            7,
            start + Duration::from_secs(30),
            sender,
        );

        match receiver.recv().await {
            Some(Event::Fire { kind, epoch }) => {
                assert_eq!(kind, ReminderKind::Posture);
                assert_eq!(epoch, 7);
            }
            _ => unreachable!(),
        }
        assert_eq!(Instant::now() - start, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_dropped_never_fires() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let guard = arm(
            ReminderKind::Break,
            1,
            Instant::now() + Duration::from_secs(5),
            sender,
        );
        drop(guard);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(receiver.try_recv().is_err());
    }
}
