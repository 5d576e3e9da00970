//! Cgroup v1 resource management.
//!
//! Provides the per-container hierarchy lifecycle and the resource-limit
//! writers for the memory, cpu, and pids controllers. [`CgroupManager`]
//! is the entry point: it validates the container identifier, resolves
//! paths through a [`CgroupLayout`], and dispatches to the submodules.

pub mod cpu;
pub mod hierarchy;
pub mod layout;
pub mod memory;
pub mod pids;
pub mod stats;

use std::fmt::Display;
use std::path::Path;

use nix::sched::{CpuSet, sched_getaffinity};
use nix::unistd::Pid;
use rocker_common::config::RockerConfig;
use rocker_common::error::{Result, RockerError};
use rocker_common::types::{ContainerId, ResourceLimits};

pub use self::cpu::CpuLimit;
pub use self::layout::{CgroupLayout, ControllerKind, V1Layout};
pub use self::stats::CgroupStats;

/// Writes a decimal value to a control file.
pub(crate) fn write_control(path: &Path, value: impl Display) -> Result<()> {
    std::fs::write(path, value.to_string()).map_err(|e| RockerError::WriteControl {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), %value, "control file written");
    Ok(())
}

/// Counts the logical CPUs this process may be scheduled on.
///
/// Only the affinity mask is consulted. A CPU quota on the caller's own
/// cgroup does not shrink the count, so rocker running inside a slice or
/// pod still sees every core of the host. Falls back to `num_cpus` if the
/// mask cannot be read.
pub fn host_logical_cpus() -> usize {
    match sched_getaffinity(Pid::from_raw(0)) {
        Ok(set) => {
            let count = (0..CpuSet::count())
                .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
                .count();
            count.max(1)
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot read CPU affinity, falling back to num_cpus");
            num_cpus::get()
        }
    }
}

/// Handle to the cgroup hierarchies of one host.
///
/// Every operation is keyed by a [`ContainerId`]; containers never share
/// directories, so distinct identifiers can be managed concurrently.
#[derive(Debug)]
pub struct CgroupManager<L = V1Layout> {
    layout: L,
    host_cpus: usize,
}

impl CgroupManager<V1Layout> {
    /// Creates a manager for the layout described by a configuration.
    #[must_use]
    pub fn from_config(config: &RockerConfig) -> Self {
        Self::new(V1Layout::from_config(config))
    }
}

impl Default for CgroupManager<V1Layout> {
    fn default() -> Self {
        Self::new(V1Layout::default())
    }
}

impl<L: CgroupLayout> CgroupManager<L> {
    /// Creates a manager over `layout`, sized to the host's logical CPUs.
    ///
    /// See [`host_logical_cpus`].
    #[must_use]
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            host_cpus: host_logical_cpus(),
        }
    }

    /// Overrides the logical CPU count CPU requests are checked against.
    #[must_use]
    pub fn with_host_cpus(mut self, host_cpus: usize) -> Self {
        self.host_cpus = host_cpus;
        self
    }

    /// The path-resolution strategy in use.
    pub const fn layout(&self) -> &L {
        &self.layout
    }

    /// Logical CPUs CPU requests are checked against.
    pub const fn host_cpus(&self) -> usize {
        self.host_cpus
    }

    /// Creates the container's hierarchy and attaches `pid` to it.
    ///
    /// See [`hierarchy::create`].
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid, a directory cannot be
    /// created, or a control file rejects the write.
    pub fn create_hierarchy(&self, id: &ContainerId, pid: Pid, create_dirs: bool) -> Result<()> {
        id.validate()?;
        hierarchy::create(&self.layout, id, pid, create_dirs)
    }

    /// Removes the container's hierarchy. Its tasks must have exited.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid or a directory cannot be removed.
    pub fn remove_hierarchy(&self, id: &ContainerId) -> Result<()> {
        id.validate()?;
        hierarchy::remove(&self.layout, id)
    }

    /// Reports whether the container has a directory under every controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid.
    pub fn exists(&self, id: &ContainerId) -> Result<bool> {
        id.validate()?;
        Ok(hierarchy::exists(&self.layout, id))
    }

    /// Applies the configured fields of `limits` to an existing hierarchy.
    ///
    /// Memory is written only for `memory_mb > 0` (with swap honoured only
    /// for `swap_mb >= 0`), CPU only for `cpu_cores > 0`, and pids only for
    /// `pids_max > 0`. A CPU request above the host's core count is skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns the first failure; limits already written stay in place.
    pub fn apply_limits(&self, id: &ContainerId, limits: &ResourceLimits) -> Result<()> {
        id.validate()?;
        if limits.is_empty() {
            tracing::debug!(id = %id, "no resource limits requested");
            return Ok(());
        }

        if let Some(memory_mb) = limits.memory_mb() {
            let dir = self.layout.container_dir(ControllerKind::Memory, id);
            memory::set_memory_limit(&dir, memory_mb, limits.swap_mb())?;
        }
        if let Some(cores) = limits.cpu_cores() {
            let dir = self.layout.container_dir(ControllerKind::Cpu, id);
            let outcome = cpu::set_cpu_limit(&dir, cores, self.host_cpus)?;
            tracing::debug!(id = %id, ?outcome, "CPU request handled");
        }
        if let Some(pids_max) = limits.pids_max() {
            let dir = self.layout.container_dir(ControllerKind::Pids, id);
            pids::set_pids_limit(&dir, pids_max)?;
        }

        tracing::info!(id = %id, "resource limits applied");
        Ok(())
    }

    /// Reads a usage snapshot for the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid or an accounting file
    /// cannot be read or parsed.
    pub fn stats(&self, id: &ContainerId) -> Result<CgroupStats> {
        id.validate()?;
        stats::collect(&self.layout, id)
    }
}
