//! Memory resource control via cgroup v1.
//!
//! Manages `memory.limit_in_bytes` and `memory.memsw.limit_in_bytes`.

use std::path::Path;

use rocker_common::constants::{BYTES_PER_MIB, MEMORY_LIMIT, MEMSW_LIMIT};
use rocker_common::error::{Result, RockerError};

use super::write_control;

/// Sets the memory ceiling and, optionally, the memory+swap ceiling.
///
/// `memory.memsw.limit_in_bytes` holds the *total* of RAM and swap, so it
/// is written as `limit_mb + swap_mb`. Without it, processes in the group
/// keep consuming swap once they hit the memory ceiling. The plain limit
/// is written first because the kernel rejects a combined limit below it.
///
/// # Errors
///
/// Returns [`RockerError::InvalidLimit`] if a value overflows a byte count
/// and [`RockerError::WriteControl`] if either file rejects the write.
pub fn set_memory_limit(cgroup_path: &Path, limit_mb: u64, swap_mb: Option<u64>) -> Result<()> {
    let limit_bytes = mib_to_bytes(limit_mb)?;
    write_control(&cgroup_path.join(MEMORY_LIMIT), limit_bytes)?;
    tracing::debug!(limit_bytes, "memory limit set");

    if let Some(swap_mb) = swap_mb {
        let total_bytes = limit_mb
            .checked_add(swap_mb)
            .ok_or_else(|| overflow(limit_mb, swap_mb))
            .and_then(mib_to_bytes)?;
        write_control(&cgroup_path.join(MEMSW_LIMIT), total_bytes)?;
        tracing::debug!(total_bytes, "memory+swap limit set");
    }
    Ok(())
}

fn mib_to_bytes(mb: u64) -> Result<u64> {
    mb.checked_mul(BYTES_PER_MIB)
        .ok_or_else(|| RockerError::InvalidLimit {
            resource: "memory",
            message: format!("{mb} MiB does not fit in a byte count"),
        })
}

fn overflow(limit_mb: u64, swap_mb: u64) -> RockerError {
    RockerError::InvalidLimit {
        resource: "memory",
        message: format!("{limit_mb} MiB + {swap_mb} MiB swap does not fit in a byte count"),
    }
}
