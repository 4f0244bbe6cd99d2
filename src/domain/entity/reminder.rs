use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// The closed set of reminders the daemon knows about.
///
/// The declaration order is the catalog order. It decides the stagger index
/// of reminders that are started together, see [`ReminderKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderKind {
    Break,
    Posture,
    StandSit,
}

impl ReminderKind {
    /// Every kind in catalog order.
    pub const ALL: [ReminderKind; 3] = [Self::Break, Self::Posture, Self::StandSit];

    /// Name used in configuration files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Posture => "posture",
            Self::StandSit => "stand-sit",
        }
    }

    /// Human readable title, used as the notification summary.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Break => "Take a Break",
            Self::Posture => "Check Posture",
            Self::StandSit => "Stand / Sit",
        }
    }

    pub fn default_interval_minutes(self) -> u64 {
        match self {
            Self::Break => 25,
            Self::Posture => 15,
            Self::StandSit => 30,
        }
    }

    pub fn default_enabled(self) -> bool {
        match self {
            Self::Break | Self::Posture => true,
            Self::StandSit => false,
        }
    }

    /// What the reminder is about, phrased for a text generator.
    pub fn prompt_description(self) -> &'static str {
        match self {
            Self::Break => "taking a short break from work to rest eyes and stretch",
            Self::Posture => "checking and correcting sitting/standing posture",
            Self::StandSit => "switching between standing and sitting position at their desk",
        }
    }

    /// Built-in messages used whenever no generated text is available.
    pub fn fallback_messages(self) -> &'static [&'static str] {
        match self {
            Self::Break => &[
                "Time for a break! Step away and rest your eyes.",
                "Break time! Stretch your legs and grab some water.",
                "You've been working hard. Take a few minutes to recharge.",
                "Your break reminder is here. A short walk does wonders!",
                "Hey, it's break time. Give your mind a rest!",
                "Take 5! Look away from the screen and breathe deeply.",
                "Break o'clock! Stand up, stretch, and reset.",
                "Reminder: short breaks boost productivity. Take one now!",
            ],
            Self::Posture => &[
                "Posture check! Sit up straight and relax your shoulders.",
                "How's your posture? Roll your shoulders back.",
                "Straighten up! Your back will thank you later.",
                "Quick posture reminder: feet flat, back straight, shoulders relaxed.",
                "Check in with your body. Are you slouching?",
                "Posture alert! Lift your chin and align your spine.",
                "Time for a posture reset. Sit tall and breathe.",
                "Friendly nudge: unclench your jaw and fix your posture!",
            ],
            Self::StandSit => &[
                "Time to switch! If you're sitting, stand up. If standing, take a seat.",
                "Alternate your position. Your body needs the change.",
                "Stand/sit switch! Keep your body moving throughout the day.",
                "Position change reminder: variety keeps you comfortable.",
                "Time to toggle! Switch between standing and sitting.",
                "Your stand/sit timer went off. Make the switch!",
                "Keep things fresh and change your working position now.",
                "Reminder: alternating positions reduces fatigue. Switch it up!",
            ],
        }
    }

    /// Short facts that may be appended below a reminder.
    pub fn facts(self) -> &'static [&'static str] {
        match self {
            Self::Break => &[
                "Looking 20 feet away for 20 seconds every 20 minutes eases eye strain.",
                "Short movement breaks help keep attention steady through the afternoon.",
                "A glass of water during a break helps against mid-day fatigue.",
            ],
            Self::Posture => &[
                "Your head weighs about 5 kg; leaning it forward multiplies the load on your neck.",
                "Keeping the screen at eye level reduces neck flexion.",
                "Elbows at roughly 90 degrees take pressure off the shoulders.",
            ],
            Self::StandSit => &[
                "Alternating positions every 30 to 60 minutes is gentler than standing all day.",
                "Shifting your weight while standing helps circulation in your legs.",
                "A footrest can relieve the lower back when sitting for long.",
            ],
        }
    }

    /// Pick one fallback message at random.
    pub fn random_fallback(self) -> &'static str {
        self.fallback_messages()
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_else(|| self.display_name())
    }

    /// Pick one fact at random, if the kind has any.
    pub fn random_fact(self) -> Option<&'static str> {
        self.facts().choose(&mut rand::rng()).copied()
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.key())
    }
}

impl FromStr for ReminderKind {
    type Err = ParseReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .context(UnknownSnafu { name: s })
    }
}

/// An error type of parsing a [`ReminderKind`] from its name.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseReminderKindError {
    #[snafu(display("Unknown reminder {name:?}, expected one of break, posture, stand-sit"))]
    #[non_exhaustive]
    Unknown { name: String },
}
