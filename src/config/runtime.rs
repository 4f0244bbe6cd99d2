use std::path::PathBuf;

use crate::config::RuntimeContent;
use crate::utils::xdg::{Xdg, XdgBaseKind, XdgError};

pub const SOCKET_FILE: &str = "daemon.socket";
pub const PID_FILE: &str = "daemon.pid";

/// Paths of the files shared by the daemon and its clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub socket: PathBuf,
    pub pid: PathBuf,
}

impl RuntimePaths {
    /// Take the paths from `[runtime]` and fall back to the XDG runtime
    /// directory for the missing ones. XDG is only consulted when needed.
    ///
    /// # Errors
    ///
    /// This function will return an error if a path has to come from XDG and
    /// the runtime directory is unusable.
    pub fn resolve(app_name: &str, runtime: &RuntimeContent) -> Result<Self, XdgError> {
        let mut xdg: Option<Xdg> = None;
        let mut place = |configured: &Option<PathBuf>, file: &str| -> Result<PathBuf, XdgError> {
            if let Some(path) = configured {
                return Ok(path.clone());
            }
            let xdg = match &mut xdg {
                Some(xdg) => xdg,
                slot => slot.insert(Xdg::new(app_name)?),
            };
            xdg.resolve_create(XdgBaseKind::Runtime, file)
        };

        Ok(Self {
            socket: place(&runtime.socket, SOCKET_FILE)?,
            pid: place(&runtime.pid, PID_FILE)?,
        })
    }
}
