use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::daemon::app::service::{
    PauseService, QueryService, ReloadService, ResumeService, SkipService, TestService,
};
use crate::domain::daemon::app::store::SettingsStore;
use crate::domain::daemon::inbound::{
    PausePort, QueryPort, ReloadPort, ResumePort, SkipPort, TestPort,
};
use crate::domain::daemon::outbound::{DeliverPort, MessagePort};
use crate::domain::daemon::worker::{self, SchedulerError};
use crate::domain::repository::{GetSettingsError, SettingsRepository};

/// Entrance to the domain logic, providing ports for external adapters.
pub struct ApplicationCore {
    pub pause: Arc<dyn PausePort>,
    pub resume: Arc<dyn ResumePort>,
    pub skip: Arc<dyn SkipPort>,
    pub query: Arc<dyn QueryPort>,
    pub test: Arc<dyn TestPort>,
    pub reload: Arc<dyn ReloadPort>,
}

impl ApplicationCore {
    /// Initialize the application by injecting external repositories and
    /// adapters. The scheduler is configured from the repository before this
    /// function returns.
    ///
    /// # Errors
    ///
    /// This function will return an error if initialization failed.
    pub async fn setup(
        message_port: Arc<dyn MessagePort>,
        deliver_port: Arc<dyn DeliverPort>,
        settings_repository: Arc<dyn SettingsRepository>,
    ) -> Result<ApplicationCore, SetupApplicationCoreError> {
        let store = SettingsStore::load(settings_repository)
            .await
            .context(SettingsSnafu)?;
        let store = Arc::new(store);

        let scheduler = worker::spawn(message_port, deliver_port);
        scheduler
            .configure(store.current().await)
            .await
            .context(SchedulerSnafu)?;

        let app = ApplicationCore {
            pause: Arc::new(PauseService::new(scheduler.clone())),
            resume: Arc::new(ResumeService::new(scheduler.clone(), Arc::clone(&store))),
            skip: Arc::new(SkipService::new(scheduler.clone(), Arc::clone(&store))),
            query: Arc::new(QueryService::new(scheduler.clone())),
            test: Arc::new(TestService::new(scheduler.clone(), Arc::clone(&store))),
            reload: Arc::new(ReloadService::new(scheduler, store)),
        };

        Ok(app)
    }
}

/// An error for initializing the application.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SetupApplicationCoreError {
    #[snafu(display("Could not load settings"))]
    Settings { source: GetSettingsError },
    #[snafu(display("Could not configure the scheduler"))]
    Scheduler { source: SchedulerError },
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::Duration;

    use crate::domain::daemon::outbound::{MockDeliverPort, MockMessagePort};
    use crate::domain::entity::{AppSettings, ReminderKind};
    use crate::domain::repository::settings::MockSettingsRepository;

    #[tokio::test(start_paused = true)]
    async fn application_core_setup_configures_scheduler() {
        let mut repository = MockSettingsRepository::new();
        repository
            .expect_settings()
            .times(1)
            .returning(|| Ok(AppSettings::default()));

        let app = ApplicationCore::setup(
            Arc::new(MockMessagePort::new()),
            Arc::new(MockDeliverPort::new()),
            Arc::new(repository),
        )
        .await
        .unwrap();

        let response = app.query.query().await.unwrap();
        assert_eq!(response.reminders[0].kind, ReminderKind::Break);
        assert_eq!(
            response.reminders[0].remaining,
            Some(Duration::from_secs(25 * 60))
        );
    }

    #[tokio::test]
    async fn application_core_setup_settings_error() {
        let mut repository = MockSettingsRepository::new();
        repository
            .expect_settings()
            .returning(|| snafu::whatever!("missing"));

        let res = ApplicationCore::setup(
            Arc::new(MockMessagePort::new()),
            Arc::new(MockDeliverPort::new()),
            Arc::new(repository),
        )
        .await;
        assert!(matches!(res, Err(SetupApplicationCoreError::Settings { .. })));
    }
}
