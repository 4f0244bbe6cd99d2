#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::Urgency;
use notify_rust::{Notification, Timeout};
use snafu::prelude::*;
use tokio::time::Duration;

use crate::domain::daemon::outbound::{DeliverError, DeliverPort, DeliveryRequest};
use crate::domain::entity::DisplayMode;
#[cfg(all(unix, not(target_os = "macos")))]
use crate::tracing_report;

const SOUND_NAME: &str = "message-new-instant";

/// Delays offered as notification actions, in minutes.
pub const SNOOZE_MINUTES: [u64; 3] = [5, 10, 15];

const DONE_ACTION: &str = "done";

/// What the user did with a shown reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderAction {
    Snooze(u64),
    Done,
    Dismissed,
}

impl ReminderAction {
    /// Parse an action identifier reported by the notification server. Unknown
    /// identifiers, including the close signal, count as dismissal.
    pub fn from_id(id: &str) -> Self {
        if id == DONE_ACTION {
            return Self::Done;
        }
        id.strip_prefix("snooze-")
            .and_then(|minutes| minutes.parse().ok())
            .filter(|minutes| SNOOZE_MINUTES.contains(minutes))
            .map_or(Self::Dismissed, Self::Snooze)
    }

    /// How long to wait before showing the reminder again.
    pub fn snooze_delay(self) -> Option<Duration> {
        match self {
            Self::Snooze(minutes) => Some(Duration::from_secs(minutes * 60)),
            Self::Done | Self::Dismissed => None,
        }
    }
}

/// A [`DeliverPort`] implementation showing desktop notifications.
#[derive(Debug, Clone)]
pub struct NotifyService {
    app_name: String,
}

impl NotifyService {
    pub fn new(app_name: String) -> Self {
        Self { app_name }
    }

    /// Build the notification for a reminder without showing it.
    pub fn notification(&self, request: &DeliveryRequest) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(request.kind.display_name())
            .body(&request.message);

        match request.mode {
            DisplayMode::Notification => {
                notification.timeout(Timeout::Default);
            }
            DisplayMode::Banner => {
                let millis = request.dismiss_seconds.saturating_mul(1000);
                notification.timeout(Timeout::Milliseconds(millis));
            }
            DisplayMode::Fullscreen => {
                notification.timeout(Timeout::Never);
                #[cfg(all(unix, not(target_os = "macos")))]
                notification.urgency(Urgency::Critical);
            }
        }

        if request.play_sound {
            notification.sound_name(SOUND_NAME);
        }

        for minutes in SNOOZE_MINUTES {
            notification.action(
                &format!("snooze-{minutes}"),
                &format!("Snooze {minutes} min"),
            );
        }
        notification.action(DONE_ACTION, "Done");

        notification
    }
}

#[async_trait::async_trait]
impl DeliverPort for NotifyService {
    async fn deliver(&self, request: DeliveryRequest) -> Result<(), DeliverError> {
        let notification = self.notification(&request);
        tracing::debug!(kind = %request.kind, mode = %request.mode, "showing notification");

        let handle = whatever!(
            notification.show_async().await,
            "Could not show notification for {}",
            request.kind
        );

        #[cfg(all(unix, not(target_os = "macos")))]
        tokio::spawn(self.clone().follow_up(handle, request));
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(handle);

        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
impl NotifyService {
    /// Wait for the user's answer and show the reminder again after a snooze.
    /// A snoozed reminder skips delivery spacing since it was asked for.
    async fn follow_up(self, handle: notify_rust::NotificationHandle, request: DeliveryRequest) {
        let waited = tokio::task::spawn_blocking(move || {
            let mut action = ReminderAction::Dismissed;
            handle.wait_for_action(|id| action = ReminderAction::from_id(id));
            action
        })
        .await;

        let action = match waited {
            Ok(action) => action,
            Err(err) => {
                tracing_report!(err, "Could not wait for a notification action");
                return;
            }
        };
        tracing::debug!(kind = %request.kind, ?action, "notification answered");

        let Some(delay) = action.snooze_delay() else {
            return;
        };
        tokio::time::sleep(delay).await;
        if let Err(err) = self.deliver(request).await {
            tracing_report!(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::entity::ReminderKind;

    fn request(mode: DisplayMode) -> DeliveryRequest {
        DeliveryRequest {
            kind: ReminderKind::Posture,
            message: "Shoulders back.".to_owned(),
            mode,
            play_sound: false,
            dismiss_seconds: 8,
        }
    }

    #[test]
    fn notify_service_notification_content() {
        let service = NotifyService::new("breather".to_owned());
        let notification = service.notification(&request(DisplayMode::Notification));
        assert_eq!(notification.appname, "breather");
        assert_eq!(notification.summary, "Check Posture");
        assert_eq!(notification.body, "Shoulders back.");
        assert_eq!(notification.timeout, Timeout::Default);
    }

    #[test]
    fn notify_service_notification_actions() {
        let service = NotifyService::new("breather".to_owned());
        for mode in [DisplayMode::Notification, DisplayMode::Fullscreen] {
            assert_eq!(
                service.notification(&request(mode)).actions,
                vec![
                    "snooze-5",
                    "Snooze 5 min",
                    "snooze-10",
                    "Snooze 10 min",
                    "snooze-15",
                    "Snooze 15 min",
                    "done",
                    "Done",
                ]
            );
        }
    }

    #[test]
    fn reminder_action_from_id() {
        assert_eq!(ReminderAction::from_id("snooze-10"), ReminderAction::Snooze(10));
        assert_eq!(ReminderAction::from_id("done"), ReminderAction::Done);
        assert_eq!(ReminderAction::from_id("__closed"), ReminderAction::Dismissed);
        assert_eq!(ReminderAction::from_id("snooze-7"), ReminderAction::Dismissed);
        assert_eq!(ReminderAction::from_id("snooze-"), ReminderAction::Dismissed);
    }

    #[test]
    fn reminder_action_snooze_delay() {
        assert_eq!(
            ReminderAction::Snooze(15).snooze_delay(),
            Some(Duration::from_secs(900))
        );
        assert_eq!(ReminderAction::Done.snooze_delay(), None);
        assert_eq!(ReminderAction::Dismissed.snooze_delay(), None);
    }

    #[test]
    fn notify_service_notification_timeout() {
        let service = NotifyService::new("breather".to_owned());
        assert_eq!(
            service.notification(&request(DisplayMode::Banner)).timeout,
            Timeout::Milliseconds(8000)
        );
        assert_eq!(
            service.notification(&request(DisplayMode::Fullscreen)).timeout,
            Timeout::Never
        );
    }
}
