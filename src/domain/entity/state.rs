use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Coarse state of one reminder's timer, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Paused,
    Stopped,
}

impl TimerStatus {
    /// Returns `true` if a timer in this state counts towards the global
    /// pause flag.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl Display for TimerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Running => f.write_str("running"),
            Self::Paused => f.write_str("paused"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_status_is_live() {
        assert!(TimerStatus::Running.is_live());
        assert!(TimerStatus::Paused.is_live());
        assert!(!TimerStatus::Stopped.is_live());
    }

    #[test]
    fn timer_status_display() {
        assert_eq!(TimerStatus::Paused.to_string(), "paused");
    }
}
