use snafu::{prelude::*, Whatever};
use tracing::Level;

/// Log an error together with its whole source chain. An extra message may
/// be given to wrap the error first.
#[macro_export]
macro_rules! tracing_report {
    ($error:expr) => {{
        tracing::error!(err = %snafu::Report::from_error(&$error));
    }};
    ($error:expr, $message:expr) => {{
        let whatever_error = <snafu::Whatever as snafu::FromString>::with_source(
            ::std::boxed::Box::new($error),
            ::std::string::ToString::to_string(&$message),
        );
        tracing::error!(err = %snafu::Report::from_error(whatever_error));
    }};
}

/// Install the global `tracing` subscriber writing to stderr.
///
/// # Errors
///
/// This function will return an error if a global subscriber is already set.
pub fn init_subscriber(level: Level) -> Result<(), Whatever> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .whatever_context("Could not setup logger")
}
