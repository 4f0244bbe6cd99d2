use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::AppSettings;
use crate::domain::repository::{GetSettingsError, SettingsRepository};

/// Latest settings read from a [`SettingsRepository`], shared by every
/// service.
pub struct SettingsStore {
    repository: Arc<dyn SettingsRepository>,
    current: RwLock<Arc<AppSettings>>,
}

impl SettingsStore {
    /// Read the settings once and keep them.
    ///
    /// # Errors
    ///
    /// This function will return an error if the repository fails.
    pub async fn load(repository: Arc<dyn SettingsRepository>) -> Result<Self, GetSettingsError> {
        let settings = repository.settings().await?;
        Ok(Self {
            repository,
            current: RwLock::new(Arc::new(settings)),
        })
    }

    pub async fn current(&self) -> Arc<AppSettings> {
        Arc::clone(&*self.current.read().await)
    }

    /// Read the settings again and replace the kept ones. The kept settings
    /// are left untouched on failure.
    ///
    /// # Errors
    ///
    /// This function will return an error if the repository fails.
    pub async fn reload(&self) -> Result<Arc<AppSettings>, GetSettingsError> {
        let settings = Arc::new(self.repository.settings().await?);
        *self.current.write().await = Arc::clone(&settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use snafu::prelude::*;

    use crate::domain::repository::settings::MockSettingsRepository;

    #[tokio::test]
    async fn settings_store_reload_keeps_old_on_error() {
        let mut repository = MockSettingsRepository::new();
        let mut seq = mockall::Sequence::new();
        repository
            .expect_settings()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(AppSettings::default()));
        repository
            .expect_settings()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                let mut settings = AppSettings::default();
                settings.append_fact = true;
                Ok(settings)
            });
        repository
            .expect_settings()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| whatever!("broken file"));

        let store = SettingsStore::load(Arc::new(repository)).await.unwrap();
        assert!(!store.current().await.append_fact);

        assert!(store.reload().await.unwrap().append_fact);
        assert!(store.current().await.append_fact);

        assert!(store.reload().await.is_err());
        assert!(store.current().await.append_fact);
    }
}
