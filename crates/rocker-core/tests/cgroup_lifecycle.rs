//! Lifecycle tests for per-container cgroup hierarchies.
//!
//! These run against a temporary directory laid out like a cgroup v1
//! mount. Where cgroupfs behaves differently from a plain directory
//! (control files vanish with the group), the tests emulate the kernel.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::Path;

use nix::unistd::Pid;
use rocker_common::error::RockerError;
use rocker_common::types::{ContainerId, ResourceLimits};
use rocker_core::cgroup::{CgroupLayout, CgroupManager, ControllerKind, V1Layout};

fn manager(root: &Path, host_cpus: usize) -> CgroupManager {
    CgroupManager::new(V1Layout::new(root, "rocker")).with_host_cpus(host_cpus)
}

fn read(manager: &CgroupManager, kind: ControllerKind, id: &ContainerId, name: &str) -> String {
    std::fs::read_to_string(manager.layout().control_file(kind, id, name))
        .unwrap_or_else(|e| panic!("reading {kind}/{name}: {e}"))
}

fn written(manager: &CgroupManager, kind: ControllerKind, id: &ContainerId, name: &str) -> bool {
    manager.layout().control_file(kind, id, name).exists()
}

/// Emulates the kernel dropping a cgroup's pseudo-files once it is empty.
fn release_control_files(manager: &CgroupManager, id: &ContainerId) {
    for kind in ControllerKind::ALL {
        let dir = manager.layout().container_dir(kind, id);
        for entry in std::fs::read_dir(&dir).expect("read_dir") {
            std::fs::remove_file(entry.expect("entry").path()).expect("remove control file");
        }
    }
}

// ── Hierarchy ────────────────────────────────────────────────────────

#[test]
fn create_yields_three_attached_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::generate();
    let pid = nix::unistd::getpid();

    manager.create_hierarchy(&id, pid, true).expect("create");

    for kind in ControllerKind::ALL {
        assert!(manager.layout().container_dir(kind, &id).is_dir(), "{kind}");
        assert_eq!(read(&manager, kind, &id, "notify_on_release"), "1");
        assert_eq!(read(&manager, kind, &id, "cgroup.procs"), pid.as_raw().to_string());
    }
    let roots: Vec<_> = std::fs::read_dir(root.path())
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().into_string().expect("utf-8"))
        .collect();
    assert_eq!(roots.len(), 3);
    assert!(manager.exists(&id).expect("exists"));
}

#[test]
fn remove_after_create_leaves_no_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("web-1");

    manager.create_hierarchy(&id, Pid::from_raw(100), true).expect("create");
    release_control_files(&manager, &id);
    manager.remove_hierarchy(&id).expect("remove");

    for kind in ControllerKind::ALL {
        assert!(!manager.layout().container_dir(kind, &id).exists(), "{kind}");
    }
    assert!(!manager.exists(&id).expect("exists"));
}

#[test]
fn remove_with_attached_tasks_fails() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("busy");

    manager.create_hierarchy(&id, Pid::from_raw(100), true).expect("create");

    let err = manager.remove_hierarchy(&id).expect_err("non-empty cgroup");
    assert!(matches!(err, RockerError::RemoveDir { .. }));
    assert!(manager.exists(&id).expect("exists"));
}

#[test]
fn containers_do_not_share_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let a = ContainerId::new("a");
    let b = ContainerId::new("b");

    manager.create_hierarchy(&a, Pid::from_raw(1), true).expect("create a");
    manager.create_hierarchy(&b, Pid::from_raw(2), true).expect("create b");
    let limits = ResourceLimits {
        pids_max: 5,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&a, &limits).expect("apply a");

    assert_eq!(read(&manager, ControllerKind::Pids, &a, "pids.max"), "5");
    assert!(!written(&manager, ControllerKind::Pids, &b, "pids.max"));
    assert_eq!(read(&manager, ControllerKind::Memory, &b, "cgroup.procs"), "2");
}

// ── Limits ───────────────────────────────────────────────────────────

#[test]
fn memory_without_swap_leaves_memsw_untouched() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("mem");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");

    let limits = ResourceLimits {
        memory_mb: 256,
        swap_mb: -1,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&id, &limits).expect("apply");

    assert_eq!(
        read(&manager, ControllerKind::Memory, &id, "memory.limit_in_bytes"),
        "268435456"
    );
    assert!(!written(&manager, ControllerKind::Memory, &id, "memory.memsw.limit_in_bytes"));
}

#[test]
fn memory_with_swap_writes_combined_ceiling() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("mem");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");

    let limits = ResourceLimits {
        memory_mb: 256,
        swap_mb: 128,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&id, &limits).expect("apply");

    assert_eq!(
        read(&manager, ControllerKind::Memory, &id, "memory.limit_in_bytes"),
        "268435456"
    );
    assert_eq!(
        read(&manager, ControllerKind::Memory, &id, "memory.memsw.limit_in_bytes"),
        "402653184"
    );
}

#[test]
fn cpu_within_host_capacity_writes_period_and_quota() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 2);
    let id = ContainerId::new("cpu");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");

    let limits = ResourceLimits {
        cpu_cores: 1.5,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&id, &limits).expect("apply");

    assert_eq!(read(&manager, ControllerKind::Cpu, &id, "cpu.cfs_period_us"), "1000000");
    assert_eq!(read(&manager, ControllerKind::Cpu, &id, "cpu.cfs_quota_us"), "1500000");
}

#[test]
fn cpu_above_host_capacity_is_silently_dropped() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 2);
    let id = ContainerId::new("cpu");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");

    let limits = ResourceLimits {
        cpu_cores: 8.0,
        pids_max: 50,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&id, &limits).expect("soft fail is not an error");

    assert!(!written(&manager, ControllerKind::Cpu, &id, "cpu.cfs_period_us"));
    assert!(!written(&manager, ControllerKind::Cpu, &id, "cpu.cfs_quota_us"));
    // Later controllers are still configured.
    assert_eq!(read(&manager, ControllerKind::Pids, &id, "pids.max"), "50");
}

#[test]
fn pids_limit_is_written_verbatim() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("pids");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");

    let limits = ResourceLimits {
        pids_max: 50,
        ..ResourceLimits::default()
    };
    manager.apply_limits(&id, &limits).expect("apply");

    assert_eq!(read(&manager, ControllerKind::Pids, &id, "pids.max"), "50");
}

#[test]
fn limits_on_missing_hierarchy_fail_with_write_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);

    let limits = ResourceLimits {
        pids_max: 50,
        ..ResourceLimits::default()
    };
    let err = manager
        .apply_limits(&ContainerId::new("never-created"), &limits)
        .expect_err("should fail");
    assert!(matches!(err, RockerError::WriteControl { .. }));
}

// ── Stats ────────────────────────────────────────────────────────────

#[test]
fn stats_reflect_accounting_files() {
    let root = tempfile::tempdir().expect("tempdir");
    let manager = manager(root.path(), 4);
    let id = ContainerId::new("stats");
    manager.create_hierarchy(&id, Pid::from_raw(1), true).expect("create");
    let pids_current = manager.layout().control_file(ControllerKind::Pids, &id, "pids.current");
    std::fs::write(pids_current, "1\n").expect("write");

    let stats = manager.stats(&id).expect("stats");
    assert_eq!(stats.pids_current, Some(1));
    assert_eq!(stats.memory_usage_bytes, None);
}
