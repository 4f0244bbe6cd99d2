mod daemon;
mod start;

pub use daemon::DaemonService;
pub use start::StartService;
