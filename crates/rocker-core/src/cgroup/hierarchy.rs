//! Creation, attachment, and removal of per-container cgroup directories.

use nix::unistd::Pid;
use rocker_common::constants::{CGROUP_PROCS, NOTIFY_ON_RELEASE};
use rocker_common::error::{Result, RockerError};
use rocker_common::types::ContainerId;

use super::layout::{CgroupLayout, ControllerKind};
use super::write_control;

/// Creates the container's cgroup under every controller and attaches `pid`.
///
/// With `create_dirs` set, each directory is created first (an existing
/// directory is fine). Then every directory gets `notify_on_release = 1`
/// and `pid` is written to `cgroup.procs`, which moves the process and its
/// future children into the group.
///
/// # Errors
///
/// Returns [`RockerError::CreateDir`] if a directory cannot be created and
/// [`RockerError::WriteControl`] if a control file rejects the write. The
/// operation stops at the first failure.
pub fn create<L>(layout: &L, id: &ContainerId, pid: Pid, create_dirs: bool) -> Result<()>
where
    L: CgroupLayout + ?Sized,
{
    if create_dirs {
        for kind in ControllerKind::ALL {
            let dir = layout.container_dir(kind, id);
            std::fs::create_dir_all(&dir).map_err(|e| RockerError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
            tracing::debug!(controller = %kind, path = %dir.display(), "cgroup directory ready");
        }
    }

    for kind in ControllerKind::ALL {
        write_control(&layout.control_file(kind, id, NOTIFY_ON_RELEASE), 1)?;
        write_control(&layout.control_file(kind, id, CGROUP_PROCS), pid.as_raw())?;
    }

    tracing::info!(id = %id, pid = pid.as_raw(), "cgroup hierarchy created");
    Ok(())
}

/// Removes the container's cgroup directory under every controller.
///
/// The kernel refuses to remove a cgroup that still has tasks attached;
/// the caller must make sure the container's processes have exited.
///
/// # Errors
///
/// Returns [`RockerError::RemoveDir`] for the first directory that cannot be removed.
pub fn remove<L>(layout: &L, id: &ContainerId) -> Result<()>
where
    L: CgroupLayout + ?Sized,
{
    for kind in ControllerKind::ALL {
        let dir = layout.container_dir(kind, id);
        std::fs::remove_dir(&dir).map_err(|e| RockerError::RemoveDir {
            path: dir.clone(),
            source: e,
        })?;
    }
    tracing::info!(id = %id, "cgroup hierarchy removed");
    Ok(())
}

/// Returns `true` when the container has a directory under every controller.
pub fn exists<L>(layout: &L, id: &ContainerId) -> bool
where
    L: CgroupLayout + ?Sized,
{
    ControllerKind::ALL
        .iter()
        .all(|&kind| layout.container_dir(kind, id).is_dir())
}
