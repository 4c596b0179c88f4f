//! Native mounts using the mount(2) syscall.
//!
//! Requires CAP_SYS_ADMIN capability.

use std::path::Path;

use hostmount_shared::errors::{HostmountError, HostmountResult};
use nix::errno::Errno;
use nix::mount::mount;
use tracing::{debug, warn};

use super::detect::detect_filesystem;
use super::{Mounter, candidate_types, mount_first_candidate, needs_no_type};
use crate::config::HostPaths;
use crate::options::MountRequest;
use crate::probe::SupportedFilesystems;

/// mount(2) backed `Mounter`.
#[derive(Debug, Clone, Default)]
pub struct NativeMounter {
    paths: HostPaths,
}

impl NativeMounter {
    pub fn new(paths: &HostPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }

    /// Filesystem types worth trying for `request`, best guess first.
    fn guess_candidates(&self, request: &MountRequest) -> Vec<String> {
        let detected = detect_filesystem(Path::new(&request.device));
        if let Some(fstype) = detected {
            debug!(device = %request.device, fstype, "Detected filesystem from superblock");
        }

        let listed = match SupportedFilesystems::probe(&self.paths.filesystems, "") {
            Ok(supported) => supported.block_types().to_vec(),
            Err(e) => {
                warn!(error = %e, "Cannot list supported filesystems, relying on detection only");
                Vec::new()
            }
        };

        candidate_types(detected.map(str::to_string).into_iter().chain(listed))
    }
}

impl Mounter for NativeMounter {
    fn mount(&self, request: &MountRequest, fstype: &str) -> HostmountResult<()> {
        sys_mount(request, Some(fstype)).map_err(|e| mount_error(request, e))?;
        debug!(device = %request.device, path = %request.path, fstype, "Mounted");
        Ok(())
    }

    fn try_mount(&self, request: &MountRequest) -> HostmountResult<()> {
        if needs_no_type(request.flags) {
            sys_mount(request, None).map_err(|e| mount_error(request, e))?;
            debug!(
                device = %request.device,
                path = %request.path,
                "Mounted without filesystem type"
            );
            return Ok(());
        }

        let candidates = self.guess_candidates(request);
        let mut last_errno = None;
        let fstype = mount_first_candidate(request, &candidates, |fstype| {
            sys_mount(request, Some(fstype)).inspect_err(|e| last_errno = Some(*e))
        })
        .map_err(|e| match (e, last_errno) {
            (HostmountError::Mount { message, hint }, Some(errno)) => HostmountError::Mount {
                message: format!("{}{}", message, privilege_note(errno)),
                hint,
            },
            (e, _) => e,
        })?;
        debug!(device = %request.device, path = %request.path, fstype = %fstype, "Mounted");
        Ok(())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn sys_mount(request: &MountRequest, fstype: Option<&str>) -> Result<(), Errno> {
    let data = (!request.data.is_empty()).then_some(request.data.as_str());
    mount(
        Some(request.device.as_str()),
        request.path.as_str(),
        fstype,
        request.flags,
        data,
    )
}

fn mount_error(request: &MountRequest, e: Errno) -> HostmountError {
    HostmountError::mount(format!(
        "Failed to mount {} on {}: {}{}",
        request.device,
        request.path,
        e,
        privilege_note(e)
    ))
}

fn privilege_note(e: Errno) -> &'static str {
    if e == Errno::EPERM && !has_cap_sys_admin() {
        " (CAP_SYS_ADMIN is required)"
    } else {
        ""
    }
}

fn has_cap_sys_admin() -> bool {
    caps::has_cap(
        None,
        caps::CapSet::Effective,
        caps::Capability::CAP_SYS_ADMIN,
    )
    .unwrap_or(false)
}
