use std::path::PathBuf;
use std::process::Stdio;

use snafu::prelude::*;
use sysinfo::System;
use tokio::process::Command;
use tracing::Level;

use crate::daemon::runtime::{ControlProcessError, ProcessController};
use crate::domain::client::outbound::{
    AlreadyRunningSnafu, ExitedSnafu, StartDaemonError, StartPort,
};

/// A [`StartPort`] implementation which runs the daemon executable with
/// `--daemonize` and waits for the foreground process to exit.
#[derive(Debug)]
pub struct StartService {
    executable: Option<PathBuf>,
    pid_file: PathBuf,
    daemon_name: String,
    config: Option<PathBuf>,
    verbosity: Level,
}

impl StartService {
    pub fn new(
        executable: Option<PathBuf>,
        pid_file: PathBuf,
        daemon_name: String,
        config: Option<PathBuf>,
        verbosity: Level,
    ) -> Self {
        Self {
            executable,
            pid_file,
            daemon_name,
            config,
            verbosity,
        }
    }

    fn detect_instance(&self) -> Result<(), StartDaemonError> {
        let system = System::new_all();
        match ProcessController::detect_instance(&system, &self.pid_file, &self.daemon_name) {
            Ok(()) => Ok(()),
            Err(ControlProcessError::MultipleProcesses { .. }) => AlreadyRunningSnafu.fail(),
            Err(err) => Err(err).whatever_context("Could not detect daemon"),
        }
    }

    fn command(&self) -> Command {
        let mut command = match &self.executable {
            Some(executable) => Command::new(executable),
            None => Command::new(&self.daemon_name),
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg("--verbosity")
            .arg(self.verbosity.to_string())
            .arg("--daemonize");

        if let Some(path) = self.config.as_ref() {
            command.arg("--config").arg(path);
        }

        command
    }
}

#[async_trait::async_trait]
impl StartPort for StartService {
    async fn start(&self) -> Result<(), StartDaemonError> {
        self.detect_instance()?;

        let output = self
            .command()
            .output()
            .await
            .whatever_context("Could not spawn daemon process")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, stderr = %stderr.trim(), "daemon failed to start");
            return ExitedSnafu.fail();
        }

        tracing::info!("daemon started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::{prelude::*, TempDir};

    fn service(executable: &str, pid_file: PathBuf, daemon_name: &str) -> StartService {
        StartService::new(
            Some(PathBuf::from(executable)),
            pid_file,
            daemon_name.to_owned(),
            None,
            Level::INFO,
        )
    }

    #[tokio::test]
    async fn start_service_start() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let service = service("true", tmp.child("daemon.pid").to_path_buf(), "breather-daemon");
        assert!(service.start().await.is_ok());
    }

    #[tokio::test]
    async fn start_service_error_exited() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let service = service("false", tmp.child("daemon.pid").to_path_buf(), "breather-daemon");
        assert!(matches!(
            service.start().await,
            Err(StartDaemonError::Exited)
        ));
    }

    #[tokio::test]
    async fn start_service_error_already_running() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let system = System::new_all();
        let pid = sysinfo::get_current_pid().unwrap();
        let name = system
            .process(pid)
            .unwrap()
            .name()
            .to_string_lossy()
            .into_owned();

        let pid_file = tmp.child("daemon.pid");
        pid_file.write_str(&pid.to_string()).unwrap();

        let service = service("true", pid_file.to_path_buf(), &name);
        assert!(matches!(
            service.start().await,
            Err(StartDaemonError::AlreadyRunning)
        ));
    }

    #[test]
    fn start_service_command_arguments() {
        let service = StartService::new(
            None,
            PathBuf::from("daemon.pid"),
            "breather-daemon".to_owned(),
            Some(PathBuf::from("/etc/breather.toml")),
            Level::DEBUG,
        );
        let command = service.command();
        let command = command.as_std();
        assert_eq!(command.get_program(), "breather-daemon");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            ["--verbosity", "DEBUG", "--daemonize", "--config", "/etc/breather.toml"]
        );
    }
}
