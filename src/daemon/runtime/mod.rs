mod process;

pub use process::{ControlProcessError, PidGuard, ProcessController};
