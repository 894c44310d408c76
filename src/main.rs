//! TronGrid CLI
//!
//! Command-line interface for querying TronGrid

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use trongrid::cli::{Cli, Runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the JSON output
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = CancellationToken::new();
    let on_interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight requests");
            on_interrupt.cancel();
        }
    });

    let runner = Runner::new(cli);
    runner.run(&ctx).await.context("trongrid command failed")
}
