use std::sync::Arc;

use crate::domain::client::outbound::{DaemonPort, StartPort};

/// Entrance to the domain logic, providing ports for external adapters.
pub struct ApplicationCore {
    pub start: Arc<dyn StartPort>,
    pub daemon: Arc<dyn DaemonPort>,
}

impl ApplicationCore {
    /// Create a new [`ApplicationCore`] by injecting external adapters.
    pub fn setup(start: Arc<dyn StartPort>, daemon: Arc<dyn DaemonPort>) -> ApplicationCore {
        Self { start, daemon }
    }
}
