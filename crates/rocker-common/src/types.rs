//! Domain primitive types used across the rocker workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_CONTAINER_ID_LEN;
use crate::error::{Result, RockerError};

/// Unique identifier for a container instance.
///
/// The identifier is used verbatim as a directory name under every
/// controller hierarchy, so it must be a single well-formed path segment.
/// [`ContainerId::validate`] enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a container ID, rejecting values that are not a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`RockerError::InvalidContainerId`] if validation fails.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = Self(id.into());
        id.validate()?;
        Ok(id)
    }

    /// Generates a random container ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks that the identifier cannot escape its controller directory.
    ///
    /// # Errors
    ///
    /// Returns [`RockerError::InvalidContainerId`] for empty identifiers,
    /// `.` and `..`, identifiers containing `/` or NUL, and identifiers
    /// longer than `NAME_MAX`.
    pub fn validate(&self) -> Result<()> {
        match segment_problem(&self.0) {
            Some(reason) => Err(RockerError::InvalidContainerId {
                id: self.0.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Explains why `segment` cannot be used as a single directory name, if it cannot.
///
/// Rejects empty values, `.` and `..`, values containing `/` or NUL, and
/// values longer than `NAME_MAX`.
#[must_use]
pub fn segment_problem(segment: &str) -> Option<&'static str> {
    if segment.is_empty() {
        Some("must not be empty")
    } else if segment == "." || segment == ".." {
        Some("must not be a relative directory reference")
    } else if segment.contains('/') {
        Some("must not contain a path separator")
    } else if segment.contains('\0') {
        Some("must not contain NUL")
    } else if segment.len() > MAX_CONTAINER_ID_LEN {
        Some("must be at most 255 bytes")
    } else {
        None
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sparse resource-limit request for a container.
///
/// Every field carries an "unset" sentinel rather than an `Option` so that
/// requests coming from flags or JSON keep their literal meaning:
///
/// - `memory_mb <= 0`: memory is not configured.
/// - `swap_mb < 0`: the memory+swap ceiling is not configured.
/// - `pids_max <= 0`: the pids controller is not configured.
/// - `cpu_cores <= 0`: CPU bandwidth is not configured.
///
/// The typed accessors apply these rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Memory ceiling in MiB.
    pub memory_mb: i64,
    /// Swap allowance in MiB, added on top of `memory_mb`.
    pub swap_mb: i64,
    /// Maximum number of tasks.
    pub pids_max: i64,
    /// CPU bandwidth in (possibly fractional) cores.
    pub cpu_cores: f64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            memory_mb: -1,
            swap_mb: -1,
            pids_max: -1,
            cpu_cores: -1.0,
        }
    }
}

impl ResourceLimits {
    /// Memory ceiling in MiB, if configured.
    #[must_use]
    pub fn memory_mb(&self) -> Option<u64> {
        u64::try_from(self.memory_mb).ok().filter(|&mb| mb > 0)
    }

    /// Swap allowance in MiB, if configured. Zero means "no swap".
    #[must_use]
    pub fn swap_mb(&self) -> Option<u64> {
        u64::try_from(self.swap_mb).ok()
    }

    /// Maximum number of tasks, if configured.
    #[must_use]
    pub fn pids_max(&self) -> Option<u64> {
        u64::try_from(self.pids_max).ok().filter(|&n| n > 0)
    }

    /// CPU bandwidth in cores, if configured.
    #[must_use]
    pub fn cpu_cores(&self) -> Option<f64> {
        (self.cpu_cores > 0.0).then_some(self.cpu_cores)
    }

    /// Returns `true` when applying these limits would write nothing.
    ///
    /// Swap on its own does not count: it is only honoured alongside a memory limit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory_mb().is_none() && self.pids_max().is_none() && self.cpu_cores().is_none()
    }
}
