//! `rocker stats`: Show resource usage of a container.

use anyhow::Context;
use clap::Args;
use rocker_common::types::ContainerId;
use rocker_core::cgroup::{CgroupManager, CgroupStats};

use crate::output::{format_bytes, format_optional};

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Container ID.
    pub id: String,

    /// Print the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `stats` command.
///
/// # Errors
///
/// Returns an error if the ID is invalid or an accounting file cannot be read.
pub fn execute(args: StatsArgs, manager: &CgroupManager) -> anyhow::Result<()> {
    let id = ContainerId::parse(args.id)?;
    let stats = manager
        .stats(&id)
        .with_context(|| format!("reading stats for {id}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render(&stats));
    }
    Ok(())
}

fn render(stats: &CgroupStats) -> String {
    format!(
        "{:<16} {}\n{:<16} {}\n{:<16} {}\n{:<16} {}\n",
        "CONTAINER ID",
        stats.container_id,
        "MEMORY",
        format_optional(stats.memory_usage_bytes, format_bytes),
        "MEMORY PEAK",
        format_optional(stats.memory_max_usage_bytes, format_bytes),
        "PIDS",
        format_optional(stats.pids_current, |n| n.to_string()),
    )
}
