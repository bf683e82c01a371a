//! FastCV - CV builder command-line application
//!
//! This is the main entry point for the `fastcv` binary.

mod cli;
mod commands;
mod state;

use clap::Parser;
use cli::Cli;
use state::AppContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting FastCV with data directory {:?}", cli.data_dir);

    let mut ctx = AppContext::open(&cli.data_dir)?;
    let output = commands::run(&mut ctx, cli.command).await?;
    println!("{}", output);
    Ok(())
}
