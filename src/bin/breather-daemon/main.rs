mod cli;
mod setup;

use clap::Parser;
use snafu::{prelude::*, Whatever};

use crate::cli::Arguments;
use crate::setup::Prepared;

#[snafu::report]
fn main() -> Result<(), Whatever> {
    let arg = Arguments::parse();
    breather::utils::tracing::init_subscriber(arg.verbosity)?;

    let prepared = setup::prepare(&arg)?;
    // Forking happens here, before any runtime thread exists.
    let _pid = setup::process(&arg, &prepared)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .whatever_context("Could not build the async runtime")?
        .block_on(run(prepared))
}

async fn run(prepared: Prepared) -> Result<(), Whatever> {
    let server = setup::bootstrap(prepared).await?;

    tokio::select! {
        res = server.serve() => res.whatever_context("Server failed to serve with fatal"),
        res = tokio::signal::ctrl_c() => {
            res.whatever_context("Could not listen for Ctrl-C")?;
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
