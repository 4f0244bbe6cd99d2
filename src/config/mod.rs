mod content;
mod reader;
mod runtime;

use std::path::{Path, PathBuf};

pub use content::{
    Configuration, GeneralContent, GenerationContent, ReminderContent, RuntimeContent,
};
pub use reader::{ReadContentError, DEFAULT_CONTENT};
pub use runtime::{RuntimePaths, PID_FILE, SOCKET_FILE};

use snafu::prelude::*;
use toml::de::Error as DeError;

use crate::utils::xdg::{Xdg, XdgBaseKind, XdgError};

/// Name of the configuration file inside the XDG configuration directory.
pub const CONFIG_FILE: &str = "config.toml";

/// An error type for loading configuraton from files.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LoadConfigurationError {
    #[snafu(display("Could not resolve XDG configuration directory"))]
    XdgConfig { source: XdgError },
    #[snafu(display("Could not read content from file"))]
    Read { source: ReadContentError },
    #[snafu(display("Could not parse configuration in {}", path.display()))]
    Parse { path: PathBuf, source: DeError },
}

/// Read configuration from given path. Optionally create one from default
/// template if it doesn't exists.
///
/// # Errors
///
/// This function will return an error if reading content from file fails or
/// parsing configuration fails.
pub fn load<P: AsRef<Path>>(
    path: P,
    create_new: bool,
) -> Result<Configuration, LoadConfigurationError> {
    let path = path.as_ref();
    let content = reader::read_content(path, create_new).context(ReadSnafu)?;
    toml::from_str(&content).context(ParseSnafu { path })
}

/// Path of the configuration file in the XDG configuration directory, with
/// its leading directories created.
///
/// # Errors
///
/// This function will return an error if XDG directories are unusable.
pub fn xdg_path(app_name: &str) -> Result<PathBuf, LoadConfigurationError> {
    Xdg::new(app_name)
        .and_then(|xdg| xdg.resolve_create(XdgBaseKind::Config, CONFIG_FILE))
        .context(XdgConfigSnafu)
}

/// Where the configuration lives and whether it may be created: an explicit
/// path is used as is, otherwise the XDG one is created on demand.
///
/// # Errors
///
/// This function will return an error if XDG directories are unusable.
pub fn locate(
    app_name: &str,
    explicit: Option<&Path>,
) -> Result<(PathBuf, bool), LoadConfigurationError> {
    match explicit {
        Some(path) => Ok((path.to_path_buf(), false)),
        None => Ok((xdg_path(app_name)?, true)),
    }
}
