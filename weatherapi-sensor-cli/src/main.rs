//! Binary crate for the `weatherapi-sensor` command-line tool.
//!
//! Stands in for the host runtime during development:
//! - Interactive configuration of credentials
//! - Constructing the sensor and invoking its operations
//! - Printing results as JSON on stdout, logs on stderr

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
