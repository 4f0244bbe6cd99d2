mod settings;

pub use settings::{convert, SettingsConfiguration};
