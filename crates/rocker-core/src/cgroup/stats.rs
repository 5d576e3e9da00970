//! Resource usage read back from cgroup accounting files.

use std::io::{self, ErrorKind};
use std::path::Path;

use rocker_common::constants::{MEMORY_MAX_USAGE, MEMORY_USAGE, PIDS_CURRENT};
use rocker_common::error::{Result, RockerError};
use rocker_common::types::ContainerId;
use serde::{Deserialize, Serialize};

use super::layout::{CgroupLayout, ControllerKind};

/// Snapshot of a container's resource usage.
///
/// A field is `None` when its accounting file does not exist, which is
/// what an unavailable controller looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgroupStats {
    /// Container this snapshot belongs to.
    pub container_id: ContainerId,
    /// Current memory usage in bytes.
    pub memory_usage_bytes: Option<u64>,
    /// Peak memory usage in bytes.
    pub memory_max_usage_bytes: Option<u64>,
    /// Number of tasks currently in the group.
    pub pids_current: Option<u64>,
}

/// Collects a usage snapshot for the given container.
///
/// # Errors
///
/// Returns [`RockerError::ReadControl`] if an accounting file exists but
/// cannot be read or does not hold a decimal integer.
pub fn collect<L>(layout: &L, id: &ContainerId) -> Result<CgroupStats>
where
    L: CgroupLayout + ?Sized,
{
    tracing::debug!(id = %id, "collecting cgroup stats");
    let memory = |name| layout.control_file(ControllerKind::Memory, id, name);
    Ok(CgroupStats {
        container_id: id.clone(),
        memory_usage_bytes: read_counter(&memory(MEMORY_USAGE))?,
        memory_max_usage_bytes: read_counter(&memory(MEMORY_MAX_USAGE))?,
        pids_current: read_counter(&layout.control_file(ControllerKind::Pids, id, PIDS_CURRENT))?,
    })
}

fn read_counter(path: &Path) -> Result<Option<u64>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(RockerError::ReadControl {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| RockerError::ReadControl {
            path: path.to_path_buf(),
            source: io::Error::new(
                ErrorKind::InvalidData,
                format!("{:?} is not a counter: {e}", raw.trim()),
            ),
        })
}
