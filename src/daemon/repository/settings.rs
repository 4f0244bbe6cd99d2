use std::path::PathBuf;

use snafu::prelude::*;

use crate::config::{self, Configuration};
use crate::domain::entity::{
    AppSettings, GenerationSettings, ReminderInterval, ReminderKind, ReminderSettings,
};
use crate::domain::repository::settings::{GetSettingsError, InvalidIntervalSnafu};
use crate::domain::repository::SettingsRepository;

/// A [`SettingsRepository`] implementation which reads the configuration
/// file again on every call.
#[derive(Debug, Clone)]
pub struct SettingsConfiguration {
    path: PathBuf,
}

impl SettingsConfiguration {
    /// Creates a new [`SettingsConfiguration`] reading the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SettingsConfiguration {
    async fn settings(&self) -> Result<AppSettings, GetSettingsError> {
        let path = self.path.clone();
        let config = tokio::task::spawn_blocking(move || config::load(path, false))
            .await
            .whatever_context("Reading configuration was interrupted")?
            .whatever_context("Could not load configuration")?;
        convert(&config)
    }
}

/// Validate the raw configuration and turn it into [`AppSettings`].
///
/// # Errors
///
/// This function will return an error if an interval is not positive.
pub fn convert(config: &Configuration) -> Result<AppSettings, GetSettingsError> {
    let mut reminders = std::collections::BTreeMap::new();

    for kind in ReminderKind::ALL {
        let defaults = ReminderSettings::defaults(kind);
        let reminder = match config.reminders.get(&kind) {
            Some(content) => ReminderSettings {
                enabled: content.enabled.unwrap_or(defaults.enabled),
                interval: match content.interval {
                    Some(minutes) => {
                        ReminderInterval::try_new(minutes).context(InvalidIntervalSnafu { kind })?
                    }
                    None => defaults.interval,
                },
                display: content.display.unwrap_or(defaults.display),
            },
            None => defaults,
        };
        reminders.insert(kind, reminder);
    }

    Ok(AppSettings {
        play_sounds: config.general.play_sounds,
        banner_dismiss_seconds: config.general.banner_dismiss_seconds,
        append_fact: config.general.append_fact,
        reminders,
        generation: GenerationSettings {
            enabled: config.generation.enabled,
            tone: config.generation.tone,
            prompt: config.generation.prompt.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    use crate::config::DEFAULT_CONTENT;
    use crate::domain::entity::interval::TryNewReminderIntervalError;
    use crate::domain::entity::{DisplayMode, Tone};

    #[test]
    fn convert_default_content() {
        let config: Configuration = toml::from_str(DEFAULT_CONTENT).unwrap();
        assert_eq!(convert(&config).unwrap(), AppSettings::default());
    }

    #[test]
    fn convert_partial_reminder() {
        let config: Configuration = toml::from_str(
            r#"
            [reminders.posture]
            interval = 10
            display = "fullscreen"

            [generation]
            enabled = true
            tone = "professional"
            prompt = "Keep it short."
            "#,
        )
        .unwrap();

        let settings = convert(&config).unwrap();
        let posture = settings.reminder(ReminderKind::Posture);
        assert!(posture.enabled);
        assert_eq!(posture.interval.minutes(), 10);
        assert_eq!(posture.display, DisplayMode::Fullscreen);
        assert_eq!(
            settings.reminder(ReminderKind::Break),
            ReminderSettings::defaults(ReminderKind::Break)
        );
        assert_eq!(settings.generation.tone, Tone::Professional);
        assert_eq!(settings.generation.prompt, "Keep it short.");
    }

    #[test]
    fn convert_error_zero_interval() {
        let config: Configuration = toml::from_str("[reminders.break]\ninterval = 0\n").unwrap();
        assert!(matches!(
            convert(&config),
            Err(GetSettingsError::InvalidInterval {
                kind: ReminderKind::Break,
                ..
            })
        ));
    }

    #[test]
    fn convert_interval_upper_bound() {
        let config: Configuration =
            toml::from_str("[reminders.stand-sit]\ninterval = 10080\n").unwrap();
        let settings = convert(&config).unwrap();
        assert_eq!(
            settings.reminder(ReminderKind::StandSit).interval,
            ReminderInterval::MAX
        );

        for minutes in [10_081, u64::MAX / 60] {
            let text = format!("[reminders.posture]\ninterval = {minutes}\n");
            let config: Configuration = toml::from_str(&text).unwrap();
            assert!(matches!(
                convert(&config),
                Err(GetSettingsError::InvalidInterval {
                    kind: ReminderKind::Posture,
                    source: TryNewReminderIntervalError::TooLong { .. },
                    ..
                })
            ));
        }
    }

    #[tokio::test]
    async fn settings_configuration_rereads_file() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let file = tmp.child("config.toml");
        file.write_str("[general]\nappend_fact = false\n").unwrap();

        let repository = SettingsConfiguration::new(file.to_path_buf());
        assert!(!repository.settings().await.unwrap().append_fact);

        file.write_str("[general]\nappend_fact = true\n").unwrap();
        assert!(repository.settings().await.unwrap().append_fact);
    }

    #[tokio::test]
    async fn settings_configuration_error_missing_file() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let repository = SettingsConfiguration::new(tmp.child("missing.toml").to_path_buf());
        assert!(matches!(
            repository.settings().await,
            Err(GetSettingsError::Unknown { .. })
        ));
    }
}
