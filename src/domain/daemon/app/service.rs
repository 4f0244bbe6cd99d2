use std::sync::Arc;

use snafu::prelude::*;

use crate::domain::daemon::app::store::SettingsStore;
use crate::domain::daemon::inbound::{
    HandleRequestError, NothingEnabledSnafu, PausePort, QueryPort, QueryResponse, ReloadPort,
    ReminderStatus, ResumePort, SchedulerSnafu, SettingsSnafu, SkipPort, TestPort,
};
use crate::domain::daemon::worker::{SchedulerHandle, SchedulerSnapshot};
use crate::domain::entity::ReminderKind;

pub struct PauseService {
    scheduler: SchedulerHandle,
}

impl PauseService {
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self { scheduler }
    }
}

#[async_trait::async_trait]
impl PausePort for PauseService {
    async fn pause(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError> {
        let result = match kind {
            Some(kind) => self.scheduler.pause(kind).await,
            None => self.scheduler.pause_all().await,
        };
        result.context(SchedulerSnafu)
    }
}

pub struct ResumeService {
    scheduler: SchedulerHandle,
    store: Arc<SettingsStore>,
}

impl ResumeService {
    pub fn new(scheduler: SchedulerHandle, store: Arc<SettingsStore>) -> Self {
        Self { scheduler, store }
    }
}

#[async_trait::async_trait]
impl ResumePort for ResumeService {
    async fn resume(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError> {
        let settings = self.store.current().await;
        let result = match kind {
            Some(kind) => self.scheduler.resume(kind, settings).await,
            None => self.scheduler.resume_all(settings).await,
        };
        result.context(SchedulerSnafu)
    }
}

pub struct SkipService {
    scheduler: SchedulerHandle,
    store: Arc<SettingsStore>,
}

impl SkipService {
    pub fn new(scheduler: SchedulerHandle, store: Arc<SettingsStore>) -> Self {
        Self { scheduler, store }
    }
}

#[async_trait::async_trait]
impl SkipPort for SkipService {
    async fn skip(&self, kind: ReminderKind) -> Result<(), HandleRequestError> {
        let settings = self.store.current().await;
        self.scheduler
            .skip_next(kind, settings)
            .await
            .context(SchedulerSnafu)
    }
}

pub struct QueryService {
    scheduler: SchedulerHandle,
}

impl QueryService {
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self { scheduler }
    }
}

#[async_trait::async_trait]
impl QueryPort for QueryService {
    async fn query(&self) -> Result<QueryResponse, HandleRequestError> {
        let SchedulerSnapshot { paused, reminders } =
            self.scheduler.snapshot().await.context(SchedulerSnafu)?;

        let reminders = reminders
            .into_iter()
            .map(|reminder| ReminderStatus {
                kind: reminder.kind,
                status: reminder.status,
                interval: reminder.interval.map(|interval| interval.minutes()),
                remaining: reminder.remaining,
            })
            .collect();

        Ok(QueryResponse { paused, reminders })
    }
}

pub struct TestService {
    scheduler: SchedulerHandle,
    store: Arc<SettingsStore>,
}

impl TestService {
    pub fn new(scheduler: SchedulerHandle, store: Arc<SettingsStore>) -> Self {
        Self { scheduler, store }
    }
}

#[async_trait::async_trait]
impl TestPort for TestService {
    async fn test(&self, kind: Option<ReminderKind>) -> Result<(), HandleRequestError> {
        let settings = self.store.current().await;
        let kind = match kind {
            Some(kind) => kind,
            None => ReminderKind::ALL
                .into_iter()
                .find(|kind| settings.reminder(*kind).enabled)
                .context(NothingEnabledSnafu)?,
        };
        self.scheduler
            .trigger_test(kind, settings)
            .await
            .context(SchedulerSnafu)
    }
}

pub struct ReloadService {
    scheduler: SchedulerHandle,
    store: Arc<SettingsStore>,
}

impl ReloadService {
    pub fn new(scheduler: SchedulerHandle, store: Arc<SettingsStore>) -> Self {
        Self { scheduler, store }
    }
}

#[async_trait::async_trait]
impl ReloadPort for ReloadService {
    async fn reload(&self) -> Result<(), HandleRequestError> {
        let settings = self.store.reload().await.context(SettingsSnafu)?;
        tracing::info!("settings reloaded");
        // Timers stay frozen until `resume`, which picks up the new settings.
        if self.scheduler.is_all_paused().await.context(SchedulerSnafu)? {
            tracing::info!("all reminders paused, timers left untouched");
            return Ok(());
        }
        self.scheduler
            .configure(settings)
            .await
            .context(SchedulerSnafu)
    }
}
