pub mod inbound;
pub mod outbound;

mod app;
mod worker;

pub use app::{ApplicationCore, SetupApplicationCoreError};
pub use worker::{
    spawn as spawn_scheduler, ReminderSnapshot, SchedulerError, SchedulerHandle,
    SchedulerSnapshot, COALESCING_GAP, STAGGER_STEP,
};
