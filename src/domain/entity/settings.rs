use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::domain::entity::interval::ReminderInterval;
use crate::domain::entity::reminder::ReminderKind;

/// How a reminder is presented once it is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Notification,
    Banner,
    Fullscreen,
}

impl Display for DisplayMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Notification => f.write_str("notification"),
            Self::Banner => f.write_str("banner"),
            Self::Fullscreen => f.write_str("fullscreen"),
        }
    }
}

/// The voice generated messages are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Friendly,
    Humorous,
    Professional,
    Motivational,
}

impl Tone {
    pub fn prompt_description(self) -> &'static str {
        match self {
            Self::Friendly => "warm and friendly",
            Self::Humorous => "lighthearted and humorous",
            Self::Professional => "professional and concise",
            Self::Motivational => "motivational and encouraging",
        }
    }
}

/// Configuration of a single reminder kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub interval: ReminderInterval,
    pub display: DisplayMode,
}

impl ReminderSettings {
    /// Catalog defaults for `kind`.
    pub fn defaults(kind: ReminderKind) -> Self {
        Self {
            enabled: kind.default_enabled(),
            interval: ReminderInterval::try_new(kind.default_interval_minutes())
                .unwrap_or(ReminderInterval::MIN),
            display: DisplayMode::default(),
        }
    }
}

/// Options forwarded untouched to the message provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSettings {
    pub enabled: bool,
    pub tone: Tone,
    pub prompt: String,
}

/// Everything the scheduler needs to know about the user's preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub play_sounds: bool,
    pub banner_dismiss_seconds: u32,
    pub append_fact: bool,
    pub reminders: BTreeMap<ReminderKind, ReminderSettings>,
    pub generation: GenerationSettings,
}

impl AppSettings {
    /// Settings of `kind`, falling back to the catalog defaults when the kind
    /// is missing.
    pub fn reminder(&self, kind: ReminderKind) -> ReminderSettings {
        self.reminders
            .get(&kind)
            .copied()
            .unwrap_or_else(|| ReminderSettings::defaults(kind))
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            play_sounds: true,
            banner_dismiss_seconds: 8,
            append_fact: false,
            reminders: ReminderKind::ALL
                .into_iter()
                .map(|kind| (kind, ReminderSettings::defaults(kind)))
                .collect(),
            generation: GenerationSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_settings_default_follows_catalog() {
        let settings = AppSettings::default();
        let posture = settings.reminder(ReminderKind::Posture);
        assert!(posture.enabled);
        assert_eq!(posture.interval.minutes(), 15);
        assert_eq!(posture.display, DisplayMode::Notification);
        assert!(!settings.reminder(ReminderKind::StandSit).enabled);
    }

    #[test]
    fn reminder_settings_defaults_use_catalog_intervals() {
        for kind in ReminderKind::ALL {
            assert_eq!(
                ReminderSettings::defaults(kind).interval.minutes(),
                kind.default_interval_minutes()
            );
        }
    }

    #[test]
    fn app_settings_reminder_fallback() {
        let mut settings = AppSettings::default();
        settings.reminders.remove(&ReminderKind::Break);
        assert_eq!(
            settings.reminder(ReminderKind::Break),
            ReminderSettings::defaults(ReminderKind::Break)
        );
    }
}
