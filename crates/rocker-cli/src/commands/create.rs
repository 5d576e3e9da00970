//! `rocker create`: Create a container's cgroups and attach a process.

use anyhow::Context;
use clap::Args;
use nix::unistd::Pid;
use rocker_common::types::ContainerId;
use rocker_core::cgroup::CgroupManager;

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Container ID. A random one is generated and printed when omitted.
    pub id: Option<String>,

    /// Process to attach (defaults to this process).
    #[arg(long)]
    pub pid: Option<i32>,

    /// Expect the cgroup directories to exist already.
    #[arg(long)]
    pub no_create_dirs: bool,
}

/// Executes the `create` command.
///
/// # Errors
///
/// Returns an error if the ID is invalid or the hierarchy cannot be created.
pub fn execute(args: CreateArgs, manager: &CgroupManager) -> anyhow::Result<()> {
    let id = match args.id {
        Some(id) => ContainerId::parse(id)?,
        None => ContainerId::generate(),
    };
    let pid = args.pid.map_or_else(nix::unistd::getpid, Pid::from_raw);

    manager
        .create_hierarchy(&id, pid, !args.no_create_dirs)
        .with_context(|| format!("creating cgroups for {id}"))?;

    println!("{id}");
    Ok(())
}
