use crate::domain::entity::ReminderKind;

/// What the client is asked to do. A missing kind addresses every reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch a daemon process in the background
    Start,
    /// Pause one reminder or all of them
    Pause(Option<ReminderKind>),
    /// Resume one reminder or all of them
    Resume(Option<ReminderKind>),
    /// Restart a reminder's countdown
    Skip(ReminderKind),
    /// Show the state of one reminder or all of them
    Status(Option<ReminderKind>),
    /// Show one reminder right away, by default the first enabled one
    Test(Option<ReminderKind>),
    /// Make the daemon re-read its configuration
    Reload,
}
