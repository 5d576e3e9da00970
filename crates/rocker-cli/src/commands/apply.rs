//! `rocker apply`: Apply resource limits to a container's cgroups.

use anyhow::Context;
use clap::Args;
use rocker_common::config::RockerConfig;
use rocker_common::types::{ContainerId, ResourceLimits};
use rocker_core::cgroup::CgroupManager;

/// Arguments for the `apply` command.
///
/// Omitted flags fall back to the configured default limits. Zero or
/// negative values leave a controller unconfigured (negative for swap).
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Container ID.
    pub id: String,

    /// Memory ceiling in MiB.
    #[arg(long, allow_negative_numbers = true)]
    pub memory: Option<i64>,

    /// Swap allowance in MiB on top of the memory ceiling.
    #[arg(long, allow_negative_numbers = true)]
    pub swap: Option<i64>,

    /// Maximum number of processes and threads.
    #[arg(long, allow_negative_numbers = true)]
    pub pids: Option<i64>,

    /// CPU bandwidth in cores, e.g. `1.5`.
    #[arg(long, allow_negative_numbers = true)]
    pub cpus: Option<f64>,
}

impl ApplyArgs {
    /// Overlays the flags given on the command line onto `defaults`.
    fn limits(&self, defaults: ResourceLimits) -> ResourceLimits {
        ResourceLimits {
            memory_mb: self.memory.unwrap_or(defaults.memory_mb),
            swap_mb: self.swap.unwrap_or(defaults.swap_mb),
            pids_max: self.pids.unwrap_or(defaults.pids_max),
            cpu_cores: self.cpus.unwrap_or(defaults.cpu_cores),
        }
    }
}

/// Executes the `apply` command.
///
/// # Errors
///
/// Returns an error if the ID is invalid or a control file rejects a write.
pub fn execute(
    args: ApplyArgs,
    config: &RockerConfig,
    manager: &CgroupManager,
) -> anyhow::Result<()> {
    let id = ContainerId::parse(args.id.as_str())?;
    let limits = args.limits(config.default_limits);
    tracing::debug!(id = %id, ?limits, "applying limits");

    manager
        .apply_limits(&id, &limits)
        .with_context(|| format!("applying limits to {id}"))
}
