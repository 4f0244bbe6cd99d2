pub mod interval;
pub mod reminder;
pub mod settings;
pub mod state;

pub use interval::ReminderInterval;
pub use reminder::ReminderKind;
pub use settings::{AppSettings, DisplayMode, GenerationSettings, ReminderSettings, Tone};
pub use state::TimerStatus;
