//! Binary crate for the `daymate` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Rendering the dashboard as text and driving the location prompts

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod interactive;
mod view;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daymate_core=warn,daymate=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
