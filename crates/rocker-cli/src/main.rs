//! # rocker
//!
//! Per-container cgroup management.
//! Creates and removes a container's cgroup hierarchy and applies
//! memory, CPU, and process-count limits to it.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    commands::execute(cli)
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
