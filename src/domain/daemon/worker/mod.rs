mod delivery;
mod handle;
mod routine;
mod state;
mod timer;

pub use delivery::COALESCING_GAP;
pub use handle::{ReminderSnapshot, SchedulerError, SchedulerHandle, SchedulerSnapshot};
pub use state::STAGGER_STEP;

use std::sync::Arc;

use crate::domain::daemon::outbound::{DeliverPort, MessagePort};

use routine::SchedulerRoutine;

/// Spawn the background scheduler and return a handle to it. The scheduler
/// runs until every clone of the handle is dropped.
pub fn spawn(message: Arc<dyn MessagePort>, deliver: Arc<dyn DeliverPort>) -> SchedulerHandle {
    let (requester, commands) = tokio::sync::mpsc::channel(16);
    SchedulerRoutine::spawn(commands, message, deliver);
    SchedulerHandle::new(requester)
}
