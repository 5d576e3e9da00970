//! `rocker remove`: Remove a container's cgroups.

use anyhow::Context;
use clap::Args;
use rocker_common::types::ContainerId;
use rocker_core::cgroup::CgroupManager;

/// Arguments for the `remove` command.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Container ID.
    pub id: String,
}

/// Executes the `remove` command.
///
/// Every process in the container must have exited; the kernel refuses
/// to remove a cgroup with tasks attached.
///
/// # Errors
///
/// Returns an error if the ID is invalid or a directory cannot be removed.
pub fn execute(args: RemoveArgs, manager: &CgroupManager) -> anyhow::Result<()> {
    let id = ContainerId::parse(args.id)?;
    manager
        .remove_hierarchy(&id)
        .with_context(|| format!("removing cgroups for {id}"))
}
