//! CPU resource control via cgroup v1 CFS bandwidth.
//!
//! Manages `cpu.cfs_period_us` and `cpu.cfs_quota_us`.

use std::path::Path;

use rocker_common::constants::{CFS_PERIOD_US, CPU_CFS_PERIOD, CPU_CFS_QUOTA};
use rocker_common::error::{Result, RockerError};

use super::write_control;

/// What [`set_cpu_limit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuLimit {
    /// Period and quota were written.
    Applied {
        /// Bandwidth period in microseconds.
        period_us: u64,
        /// CPU time allowed per period in microseconds.
        quota_us: u64,
    },
    /// The request asked for more cores than the host has; nothing was written.
    ExceedsHost {
        /// Logical CPUs available on the host.
        host_cpus: usize,
    },
}

/// Limits the cgroup to `cores` worth of CPU time.
///
/// The period is fixed at one second and the quota is `period * cores`,
/// so `1.5` cores allows 1.5s of CPU time per wall-clock second. The quota
/// is rounded to the nearest microsecond, not truncated: `0.57` cores gives
/// `570000`. A request above `host_cpus` is an expected condition: it is
/// logged and ignored rather than treated as an error.
///
/// # Errors
///
/// Returns [`RockerError::InvalidLimit`] for a non-finite or non-positive
/// core count and [`RockerError::WriteControl`] if either file rejects the write.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn set_cpu_limit(cgroup_path: &Path, cores: f64, host_cpus: usize) -> Result<CpuLimit> {
    if !cores.is_finite() || cores <= 0.0 {
        return Err(RockerError::InvalidLimit {
            resource: "cpu",
            message: format!("core count must be a positive number, got {cores}"),
        });
    }

    if cores > host_cpus as f64 {
        tracing::info!(
            cores,
            host_cpus,
            "ignoring CPU quota larger than the number of available CPUs"
        );
        return Ok(CpuLimit::ExceedsHost { host_cpus });
    }

    let period_us = CFS_PERIOD_US;
    let quota_us = (period_us as f64 * cores).round() as u64;
    write_control(&cgroup_path.join(CPU_CFS_PERIOD), period_us)?;
    write_control(&cgroup_path.join(CPU_CFS_QUOTA), quota_us)?;
    tracing::debug!(quota_us, period_us, "CPU bandwidth set");
    Ok(CpuLimit::Applied {
        period_us,
        quota_us,
    })
}
