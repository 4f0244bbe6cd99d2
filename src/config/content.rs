use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::entity::{DisplayMode, ReminderKind, Tone};

/// Raw content of the configuration file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub general: GeneralContent,
    pub reminders: BTreeMap<ReminderKind, ReminderContent>,
    pub generation: GenerationContent,
    pub runtime: RuntimeContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralContent {
    pub play_sounds: bool,
    pub banner_dismiss_seconds: u32,
    pub append_fact: bool,
}

impl Default for GeneralContent {
    fn default() -> Self {
        Self {
            play_sounds: true,
            banner_dismiss_seconds: 8,
            append_fact: false,
        }
    }
}

/// One `[reminders.<kind>]` table. Missing keys take the catalog defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReminderContent {
    pub enabled: Option<bool>,
    pub interval: Option<u64>,
    pub display: Option<DisplayMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationContent {
    pub enabled: bool,
    pub tone: Tone,
    pub prompt: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeContent {
    pub socket: Option<PathBuf>,
    pub pid: Option<PathBuf>,
}
