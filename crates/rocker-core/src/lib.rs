//! # rocker-core
//!
//! Kernel-level resource isolation for a single container.
//!
//! This crate owns the per-container cgroup v1 hierarchy:
//! - **Hierarchy**: creating and removing one directory per controller
//!   (memory, cpu, pids) and attaching a process to all of them.
//! - **Limits**: memory and memory+swap ceilings, CFS bandwidth, and
//!   maximum task count, written as raw decimal integers.
//! - **Layout**: a pluggable strategy mapping controllers and container
//!   identifiers to filesystem paths.
//!
//! Every operation is a synchronous filesystem call and returns a
//! categorized [`rocker_common::error::RockerError`] on failure; nothing
//! is retried or rolled back.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cgroup;
