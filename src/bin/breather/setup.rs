use std::sync::Arc;

use breather::client::app::connector::{Connector, UnixConnector};
use breather::client::outbound::{DaemonService, StartService};
use breather::client::Client;
use breather::config::{self, RuntimePaths};
use breather::domain::client::ApplicationCore;
use snafu::{prelude::*, Whatever};
use tracing::Level;

use crate::cli::{Arguments, Command};

const APP_NAME: &str = "breather";
const DAEMON_NAME: &str = "breather-daemon";

pub fn bootstrap(args: &Arguments) -> Result<Client, Whatever> {
    let paths = runtime_paths(args)?;
    let core = core(args, paths);
    Ok(Client::new(core))
}

fn runtime_paths(args: &Arguments) -> Result<RuntimePaths, Whatever> {
    let (path, create_new) = config::locate(APP_NAME, args.config.as_deref())
        .whatever_context("Could not locate configuration")?;
    let configuration =
        config::load(path, create_new).whatever_context("Could not load configuration")?;

    RuntimePaths::resolve(APP_NAME, &configuration.runtime)
        .whatever_context("Could not use XDG base directories")
}

fn core(args: &Arguments, paths: RuntimePaths) -> Arc<ApplicationCore> {
    let (executable, verbosity) = match &args.command {
        Command::Start {
            executable,
            verbosity,
        } => (executable.clone(), *verbosity),
        _ => (None, Level::INFO),
    };

    let connector: Arc<dyn Connector> = Arc::new(UnixConnector::new(paths.socket));

    let start_port = Arc::new(StartService::new(
        executable,
        paths.pid,
        DAEMON_NAME.to_owned(),
        args.config.clone(),
        verbosity,
    ));
    let daemon_port = Arc::new(DaemonService::new(connector));

    Arc::new(ApplicationCore::setup(start_port, daemon_port))
}
