//! Task-count control via the pids controller.

use std::path::Path;

use rocker_common::constants::PIDS_MAX;
use rocker_common::error::Result;

use super::write_control;

/// Caps the number of processes and threads in the cgroup.
///
/// Once the count is reached the kernel fails further `fork`/`clone` calls.
///
/// # Errors
///
/// Returns an error if writing to `pids.max` fails.
pub fn set_pids_limit(cgroup_path: &Path, limit: u64) -> Result<()> {
    write_control(&cgroup_path.join(PIDS_MAX), limit)?;
    tracing::debug!(limit, "pids limit set");
    Ok(())
}
