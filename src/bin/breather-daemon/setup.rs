use std::path::PathBuf;
use std::sync::Arc;

use breather::config::{self, Configuration, RuntimePaths};
use breather::daemon::app::UnixListener;
use breather::daemon::outbound::{MessageService, NotifyService};
use breather::daemon::repository::SettingsConfiguration;
use breather::daemon::runtime::{PidGuard, ProcessController};
use breather::daemon::Server;
use breather::domain::daemon::ApplicationCore;
use snafu::{prelude::*, Whatever};

use crate::cli::Arguments;

const APP_NAME: &str = "breather";
const DAEMON_NAME: &str = "breather-daemon";

/// Everything resolved before the process may fork.
pub struct Prepared {
    config_path: PathBuf,
    configuration: Configuration,
    paths: RuntimePaths,
}

pub fn prepare(arg: &Arguments) -> Result<Prepared, Whatever> {
    let (config_path, create_new) = config::locate(APP_NAME, arg.config.as_deref())
        .whatever_context("Could not locate configuration")?;
    // Daemonizing changes the working directory.
    let config_path = std::path::absolute(&config_path)
        .whatever_context(format!("Invalid path {}", config_path.display()))?;

    let configuration = config::load(&config_path, create_new)
        .whatever_context("Could not load configuration")?;

    let mut paths = RuntimePaths::resolve(APP_NAME, &configuration.runtime)
        .whatever_context("Could not use XDG base directories")?;
    if let Some(socket) = &arg.socket {
        paths.socket = std::path::absolute(socket)
            .whatever_context(format!("Invalid path {}", socket.display()))?;
    }

    tracing::info!(
        config = %config_path.display(),
        socket = %paths.socket.display(),
        "prepared daemon"
    );

    Ok(Prepared {
        config_path,
        configuration,
        paths,
    })
}

pub fn process(arg: &Arguments, prepared: &Prepared) -> Result<PidGuard, Whatever> {
    ProcessController::new(
        DAEMON_NAME.to_owned(),
        prepared.paths.pid.clone(),
        arg.daemonize,
    )
    .start()
    .whatever_context("Could not prepare process")
}

pub async fn bootstrap(prepared: Prepared) -> Result<Server, Whatever> {
    let listener = UnixListener::bind_replacing(&prepared.paths.socket)
        .whatever_context("Could not create the daemon socket")?;

    let message_port = Arc::new(MessageService::new(
        prepared.configuration.generation.command.clone(),
    ));
    let deliver_port = Arc::new(NotifyService::new(APP_NAME.to_owned()));
    let settings_repository = Arc::new(SettingsConfiguration::new(prepared.config_path));

    let core = ApplicationCore::setup(message_port, deliver_port, settings_repository)
        .await
        .whatever_context("Could not setup application core")?;

    Ok(Server::new(Box::new(listener), core))
}
