//! Global configuration model for rocker.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RockerError};
use crate::types::{ResourceLimits, segment_problem};

/// Root configuration for rocker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockerConfig {
    /// Mount point holding one directory per cgroup v1 controller.
    pub cgroup_root: PathBuf,
    /// Directory name reserved for rocker under each controller.
    pub namespace: String,
    /// Limits applied when a request leaves a field unset.
    pub default_limits: ResourceLimits,
}

impl Default for RockerConfig {
    fn default() -> Self {
        Self {
            cgroup_root: PathBuf::from(crate::constants::CGROUP_V1_ROOT),
            namespace: crate::constants::CGROUP_NAMESPACE.to_owned(),
            default_limits: ResourceLimits::default(),
        }
    }
}

impl RockerConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails [`RockerConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RockerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`RockerConfig::load`], but falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks that the namespace stays inside each controller hierarchy.
    ///
    /// Call again after overriding fields loaded from a file.
    ///
    /// # Errors
    ///
    /// Returns [`RockerError::Config`] if the namespace is not a single
    /// path segment: empty, `.`, `..`, or containing `/` or NUL.
    pub fn validate(&self) -> Result<()> {
        match segment_problem(&self.namespace) {
            Some(reason) => Err(RockerError::Config {
                message: format!("namespace {:?} {reason}", self.namespace),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_v1_mount() {
        let config = RockerConfig::default();
        assert_eq!(config.cgroup_root, PathBuf::from("/sys/fs/cgroup"));
        assert_eq!(config.namespace, "rocker");
        assert!(config.default_limits.is_empty());
    }

    #[test]
    fn load_fills_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"namespace": "ci", "default_limits": {"pids_max": 64}}"#)
            .expect("write config");

        let config = RockerConfig::load(&path).expect("load");
        assert_eq!(config.namespace, "ci");
        assert_eq!(config.cgroup_root, PathBuf::from("/sys/fs/cgroup"));
        assert_eq!(config.default_limits.pids_max(), Some(64));
        assert_eq!(config.default_limits.memory_mb(), None);
    }

    #[test]
    fn load_rejects_nested_namespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"namespace": "a/b"}"#).expect("write config");

        let err = RockerConfig::load(&path).expect_err("should reject");
        assert!(matches!(err, RockerError::Config { .. }));
    }

    #[test]
    fn load_rejects_parent_namespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"namespace": ".."}"#).expect("write config");

        let err = RockerConfig::load(&path).expect_err("should reject");
        assert!(matches!(err, RockerError::Config { .. }));
    }

    #[test]
    fn validate_rejects_overridden_namespace() {
        let mut config = RockerConfig::default();
        assert!(config.validate().is_ok());
        for bad in ["", ".", "..", "../../etc", "nul\0"] {
            config.namespace = bad.into();
            assert!(config.validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").expect("write config");

        let err = RockerConfig::load(&path).expect_err("should fail");
        assert!(matches!(err, RockerError::Serialization { .. }));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            RockerConfig::load_or_default(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(config, RockerConfig::default());
    }
}
