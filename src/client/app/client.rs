use std::sync::Arc;

use snafu::prelude::*;
use tokio::time::Duration;

use crate::client::app::command::Command;
use crate::domain::client::outbound::{
    QueryResponse, ReminderStatus, RequestDaemonError, StartDaemonError,
};
use crate::domain::client::ApplicationCore;
use crate::domain::entity::ReminderKind;

/// Main business logic implementation in client side.
pub struct Client {
    core: Arc<ApplicationCore>,
}

impl Client {
    /// Creates a new [`Client`].
    pub fn new(core: Arc<ApplicationCore>) -> Self {
        Self { core }
    }

    /// Run specific function according to `command` and return what should
    /// be shown to the user.
    ///
    /// # Errors
    ///
    /// This function will return an error if the daemon fails to start or to
    /// answer with a valid response.
    pub async fn run(&self, command: Command) -> Result<String, ClientError> {
        let daemon = &self.core.daemon;
        match command {
            Command::Start => {
                self.core.start.start().await.context(StartDaemonSnafu)?;
                Ok("Daemon started".to_owned())
            }
            Command::Pause(kind) => {
                daemon.pause(kind).await.context(RequestSnafu)?;
                Ok(format!("Paused {}", target(kind)))
            }
            Command::Resume(kind) => {
                daemon.resume(kind).await.context(RequestSnafu)?;
                Ok(format!("Resumed {}", target(kind)))
            }
            Command::Skip(kind) => {
                daemon.skip(kind).await.context(RequestSnafu)?;
                Ok(format!("Restarted {}", kind.display_name()))
            }
            Command::Status(kind) => {
                let response = daemon.query().await.context(RequestSnafu)?;
                Ok(render_status(&response, kind))
            }
            Command::Test(kind) => {
                daemon.test(kind).await.context(RequestSnafu)?;
                let sent = kind.map_or("the first enabled reminder", ReminderKind::display_name);
                Ok(format!("Sent {sent}"))
            }
            Command::Reload => {
                daemon.reload().await.context(RequestSnafu)?;
                Ok("Configuration reloaded".to_owned())
            }
        }
    }
}

fn target(kind: Option<ReminderKind>) -> &'static str {
    kind.map_or("all reminders", ReminderKind::display_name)
}

/// Format a status table, one line per reminder, followed by the global
/// pause flag when every reminder is shown.
pub fn render_status(response: &QueryResponse, kind: Option<ReminderKind>) -> String {
    let rows: Vec<_> = response
        .reminders
        .iter()
        .filter(|status| kind.map_or(true, |kind| status.kind == kind))
        .collect();

    let name_align = rows
        .iter()
        .map(|status| status.kind.display_name().len())
        .max()
        .unwrap_or_default();

    let mut lines: Vec<String> = rows
        .into_iter()
        .map(|status| render_line(status, name_align))
        .collect();

    if kind.is_none() {
        let paused = if response.paused { "yes" } else { "no" };
        lines.push(format!("All paused: {paused}"));
    }

    lines.join("\n")
}

fn render_line(status: &ReminderStatus, name_align: usize) -> String {
    let mut line = format!(
        "{:<name_align$}  {:<7}",
        status.kind.display_name(),
        status.status.to_string()
    );

    if let Some(interval) = status.interval {
        line.push_str(&format!("  every {interval} min"));
    }

    if let Some(remaining) = status.remaining {
        line.push_str(&format!("  {} left", clock(remaining)));
    }

    line.trim_end().to_owned()
}

/// `mm:ss`, where minutes may exceed 59.
fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// An error for client's operations.
#[derive(Debug, Snafu)]
pub enum ClientError {
    #[snafu(display("Could not start daemon"))]
    StartDaemon { source: StartDaemonError },
    #[snafu(display("Could not request daemon"))]
    Request { source: RequestDaemonError },
}
