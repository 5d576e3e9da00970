//! System-wide constants and default paths.

/// Mount point under which every cgroup v1 controller hierarchy lives.
pub const CGROUP_V1_ROOT: &str = "/sys/fs/cgroup";

/// Path segment reserved for rocker inside each controller hierarchy.
pub const CGROUP_NAMESPACE: &str = "rocker";

/// Flag file asking the kernel to release the cgroup once it is empty.
pub const NOTIFY_ON_RELEASE: &str = "notify_on_release";
/// Membership file; writing a PID moves that process into the cgroup.
pub const CGROUP_PROCS: &str = "cgroup.procs";

/// Hard memory ceiling in bytes.
pub const MEMORY_LIMIT: &str = "memory.limit_in_bytes";
/// Combined memory + swap ceiling in bytes.
pub const MEMSW_LIMIT: &str = "memory.memsw.limit_in_bytes";
/// Current memory usage in bytes.
pub const MEMORY_USAGE: &str = "memory.usage_in_bytes";
/// Peak memory usage in bytes.
pub const MEMORY_MAX_USAGE: &str = "memory.max_usage_in_bytes";

/// CFS bandwidth period in microseconds.
pub const CPU_CFS_PERIOD: &str = "cpu.cfs_period_us";
/// CFS bandwidth quota in microseconds.
pub const CPU_CFS_QUOTA: &str = "cpu.cfs_quota_us";

/// Maximum number of tasks.
pub const PIDS_MAX: &str = "pids.max";
/// Current number of tasks.
pub const PIDS_CURRENT: &str = "pids.current";

/// Fixed CFS bandwidth period: one second.
pub const CFS_PERIOD_US: u64 = 1_000_000;

/// Bytes in one MiB; limits are requested in MiB and written in bytes.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Longest identifier usable as a single path segment (`NAME_MAX`).
pub const MAX_CONTAINER_ID_LEN: usize = 255;

/// Default location of the JSON configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/rocker/config.json";
