//! CLI command definitions and dispatch.

pub mod apply;
pub mod create;
pub mod remove;
pub mod stats;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rocker_common::config::RockerConfig;
use rocker_core::cgroup::CgroupManager;

/// rocker: per-container cgroup management.
#[derive(Parser, Debug)]
#[command(name = "rocker", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the JSON configuration file.
    #[arg(
        long,
        global = true,
        env = "ROCKER_CONFIG",
        default_value = rocker_common::constants::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Mount point of the cgroup v1 controllers (overrides the config file).
    #[arg(long, global = true, env = "ROCKER_CGROUP_ROOT")]
    pub cgroup_root: Option<PathBuf>,

    /// Directory reserved for rocker under each controller (overrides the config file).
    #[arg(long, global = true, env = "ROCKER_NAMESPACE")]
    pub namespace: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl Cli {
    /// Loads the configuration file and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be loaded,
    /// or if the resulting namespace is not a single path segment.
    pub fn load_config(&self) -> anyhow::Result<RockerConfig> {
        let mut config = RockerConfig::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(root) = &self.cgroup_root {
            config.cgroup_root.clone_from(root);
        }
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a container's cgroups and attach a process to them.
    Create(create::CreateArgs),
    /// Apply memory, CPU, and pids limits to an existing hierarchy.
    Apply(apply::ApplyArgs),
    /// Remove a container's cgroups once its processes have exited.
    Remove(remove::RemoveArgs),
    /// Show resource usage of a container.
    Stats(stats::StatsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    let manager = CgroupManager::from_config(&config);
    tracing::debug!(
        root = %config.cgroup_root.display(),
        namespace = %config.namespace,
        "cgroup layout resolved"
    );

    match cli.command {
        Command::Create(args) => create::execute(args, &manager),
        Command::Apply(args) => apply::execute(args, &config, &manager),
        Command::Remove(args) => remove::execute(args, &manager),
        Command::Stats(args) => stats::execute(args, &manager),
    }
}
