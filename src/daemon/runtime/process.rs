use std::fs::File;
use std::io::{Error as IoError, ErrorKind as IoErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use daemonize::{Daemonize, Error as DaemonizeError};
use snafu::prelude::*;
use sysinfo::{Pid, System};

/// A process manager responsible for daemonization and preventing multiple
/// running instances.
#[derive(Debug)]
pub struct ProcessController {
    process_name: String,
    pid_file: PathBuf,
    daemonize: bool,
}

impl ProcessController {
    /// Creates a new [`ProcessController`]. Live processes whose name contains
    /// `process_name` count as running instances.
    pub fn new(process_name: String, pid_file: PathBuf, daemonize: bool) -> Self {
        Self {
            process_name,
            pid_file,
            daemonize,
        }
    }

    /// Refuse to start next to a running instance, then daemonize or record
    /// the PID of this process.
    ///
    /// # Errors
    ///
    /// This function will return an error if another instance is running or
    /// the PID file cannot be written.
    pub fn start(self) -> Result<PidGuard, ControlProcessError> {
        let system = System::new_all();
        Self::detect_instance(&system, &self.pid_file, &self.process_name)?;

        if self.daemonize {
            Daemonize::new()
                .pid_file(&self.pid_file)
                .start()
                .context(DaemonizeSnafu)?;
        } else {
            let pid =
                sysinfo::get_current_pid().map_err(|err| GetPidSnafu { message: err }.build())?;
            Self::write_pid(&self.pid_file, pid)?;
        }

        tracing::debug!(pid_file = %self.pid_file.display(), "recorded daemon PID");
        Ok(PidGuard {
            path: self.pid_file,
        })
    }

    /// Check whether the PID file names a live process called `process_name`.
    /// A missing PID file or a dead process means no instance is running.
    ///
    /// # Errors
    ///
    /// This function will return an error if an instance is running or the
    /// PID file is unreadable.
    pub fn detect_instance<P: AsRef<Path>>(
        system: &System,
        pid_file: P,
        process_name: &str,
    ) -> Result<(), ControlProcessError> {
        let mut file = match File::open(pid_file) {
            Ok(file) => file,
            Err(err) if err.kind() == IoErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err).context(FileSystemSnafu {
                    message: "Could not open PID file",
                })
            }
        };

        let mut content = String::new();
        file.read_to_string(&mut content).context(FileSystemSnafu {
            message: "Could not read PID file",
        })?;

        let pid = content
            .trim()
            .parse::<Pid>()
            .map_err(|_| InvalidPidFileSnafu.build())?;

        match system.process(pid) {
            Some(process) if process.name().to_string_lossy().contains(process_name) => {
                MultipleProcessesSnafu { pid: pid.as_u32() }.fail()
            }
            _ => Ok(()),
        }
    }

    fn write_pid<P: AsRef<Path>>(pid_file: P, pid: Pid) -> Result<(), ControlProcessError> {
        let mut file = File::create(pid_file).context(FileSystemSnafu {
            message: "Could not write PID",
        })?;
        file.write_all(pid.to_string().as_bytes())
            .context(FileSystemSnafu {
                message: "Could not write PID",
            })
    }
}

/// Removes the PID file when the daemon exits in order.
#[derive(Debug)]
#[must_use]
pub struct PidGuard {
    path: PathBuf,
}

impl PidGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidGuard {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %err, "could not remove PID file");
        }
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ControlProcessError {
    #[snafu(display("File system error: {message}"))]
    FileSystem { message: String, source: IoError },
    #[snafu(display("Another daemon is already running with PID {pid}"))]
    MultipleProcesses { pid: u32 },
    #[snafu(display("Could not ensure process uniqueness with invalid PID file"))]
    InvalidPidFile,
    #[snafu(display("Failed to get PID: {message}"))]
    GetPid { message: String },
    #[snafu(display("Could not daemonize the process"))]
    Daemonize { source: DaemonizeError },
}
