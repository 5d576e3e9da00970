//! Controller path resolution.
//!
//! Maps a controller and a container identifier to the cgroup directory
//! and control files for that pair. Resolution is pure: nothing here
//! touches the filesystem.
//!
//! ```text
//! /sys/fs/cgroup/                 <- cgroup v1 mount root
//! ├── memory/rocker/<id>/         <- memory.limit_in_bytes, memory.memsw.limit_in_bytes
//! ├── cpu/rocker/<id>/            <- cpu.cfs_period_us, cpu.cfs_quota_us
//! └── pids/rocker/<id>/           <- pids.max
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use rocker_common::config::RockerConfig;
use rocker_common::constants::{CGROUP_NAMESPACE, CGROUP_V1_ROOT};
use rocker_common::types::ContainerId;

/// The closed set of controllers rocker manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    /// Memory and memory+swap ceilings.
    Memory,
    /// CFS bandwidth control.
    Cpu,
    /// Maximum task count.
    Pids,
}

impl ControllerKind {
    /// Every managed controller, in the order hierarchies are created.
    pub const ALL: [Self; 3] = [Self::Memory, Self::Cpu, Self::Pids];

    /// Name of the controller's hierarchy directory under the mount root.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Cpu => "cpu",
            Self::Pids => "pids",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strategy for locating controller hierarchies on the host.
///
/// Only [`CgroupLayout::controller_root`] is layout specific; the
/// per-container directory and control files hang off it.
pub trait CgroupLayout: fmt::Debug + Send + Sync {
    /// Directory holding every rocker cgroup for `kind`.
    fn controller_root(&self, kind: ControllerKind) -> PathBuf;

    /// The cgroup directory for one container under `kind`.
    fn container_dir(&self, kind: ControllerKind, id: &ContainerId) -> PathBuf {
        self.controller_root(kind).join(id.as_str())
    }

    /// A control file inside the container's cgroup directory.
    fn control_file(&self, kind: ControllerKind, id: &ContainerId, name: &str) -> PathBuf {
        self.container_dir(kind, id).join(name)
    }
}

/// Classic cgroup v1 layout: one mount per controller.
///
/// Controller roots are `<root>/<controller>/<namespace>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Layout {
    root: PathBuf,
    namespace: String,
}

impl V1Layout {
    /// Creates a layout rooted at `root`, reserving `namespace` under each controller.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            namespace: namespace.into(),
        }
    }

    /// Builds the layout described by a configuration.
    #[must_use]
    pub fn from_config(config: &RockerConfig) -> Self {
        Self::new(config.cgroup_root.clone(), config.namespace.clone())
    }

    /// The mount root holding the controller hierarchies.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The namespace segment reserved for rocker.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for V1Layout {
    fn default() -> Self {
        Self::new(CGROUP_V1_ROOT, CGROUP_NAMESPACE)
    }
}

impl CgroupLayout for V1Layout {
    fn controller_root(&self, kind: ControllerKind) -> PathBuf {
        self.root.join(kind.name()).join(&self.namespace)
    }
}
