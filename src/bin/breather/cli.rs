use std::path::PathBuf;

use breather::client::Command as ClientCommand;
use breather::domain::entity::ReminderKind;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    /// Path to a custom configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch a daemon process in the background
    Start {
        /// Path to the daemon executable
        #[arg(short, long)]
        executable: Option<PathBuf>,
        /// Maximum logging level the daemon should use
        #[arg(short, long, default_value_t = Level::INFO)]
        verbosity: Level,
    },
    /// Pause a reminder, or every reminder if none is given
    Pause {
        /// One of break, posture, stand-sit
        kind: Option<ReminderKind>,
    },
    /// Resume a reminder, or every reminder if none is given
    Resume {
        /// One of break, posture, stand-sit
        kind: Option<ReminderKind>,
    },
    /// Restart a reminder's countdown from its full interval
    Skip {
        /// One of break, posture, stand-sit
        kind: ReminderKind,
    },
    /// Show the state of a reminder, or of every reminder if none is given
    Status {
        /// One of break, posture, stand-sit
        kind: Option<ReminderKind>,
    },
    /// Show a reminder right away, the first enabled one if none is given
    Test {
        /// One of break, posture, stand-sit
        kind: Option<ReminderKind>,
    },
    /// Make the daemon re-read its configuration
    Reload,
}

impl From<Command> for ClientCommand {
    fn from(value: Command) -> Self {
        match value {
            Command::Start { .. } => Self::Start,
            Command::Pause { kind } => Self::Pause(kind),
            Command::Resume { kind } => Self::Resume(kind),
            Command::Skip { kind } => Self::Skip(kind),
            Command::Status { kind } => Self::Status(kind),
            Command::Test { kind } => Self::Test(kind),
            Command::Reload => Self::Reload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn arguments_parse() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn arguments_reminder_kind() {
        let args = Arguments::parse_from(["breather", "pause", "stand-sit"]);
        assert_eq!(
            ClientCommand::from(args.command),
            ClientCommand::Pause(Some(ReminderKind::StandSit))
        );

        let args = Arguments::parse_from(["breather", "status"]);
        assert_eq!(ClientCommand::from(args.command), ClientCommand::Status(None));

        assert!(Arguments::try_parse_from(["breather", "skip", "nap"]).is_err());
        let args = Arguments::parse_from(["breather", "test"]);
        assert_eq!(ClientCommand::from(args.command), ClientCommand::Test(None));
        assert!(Arguments::try_parse_from(["breather", "test", "nap"]).is_err());
    }
}
