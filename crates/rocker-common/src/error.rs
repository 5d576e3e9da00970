//! Unified error type for the rocker workspace.
//!
//! Each cgroup failure category gets its own variant so callers can tell a
//! failed directory creation from a rejected control-file write or a refused
//! removal without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RockerError {
    /// A cgroup directory could not be created.
    #[error("unable to create cgroup directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A cgroup control file rejected a write.
    #[error("unable to write cgroup control file {path}: {source}")]
    WriteControl {
        /// Control file that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A cgroup directory could not be removed.
    #[error("unable to remove cgroup directory {path}: {source}")]
    RemoveDir {
        /// Directory that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A cgroup accounting file could not be read.
    #[error("unable to read cgroup control file {path}: {source}")]
    ReadControl {
        /// Control file that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O operation outside the cgroup tree failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A container identifier cannot be used as a path segment.
    #[error("invalid container id {id:?}: {reason}")]
    InvalidContainerId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A requested limit cannot be expressed to the kernel.
    #[error("invalid {resource} limit: {message}")]
    InvalidLimit {
        /// Resource the limit applies to.
        resource: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RockerError>;
