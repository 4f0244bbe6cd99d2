pub mod settings;

pub use settings::{GetSettingsError, SettingsRepository};
