//! Mount primitives.
//!
//! - `Mounter` - the seam the dispatcher calls
//! - `NativeMounter` - mount(2) with filesystem type guessing
//! - `detect` - superblock magic detection used when guessing

pub mod detect;
mod native;

use hostmount_shared::errors::{HostmountError, HostmountResult};
use nix::errno::Errno;
use nix::mount::MsFlags;

use crate::options::MountRequest;

pub use native::NativeMounter;

/// Performs the kernel mount for a translated request.
pub trait Mounter {
    /// Mount with the explicit filesystem type `fstype`.
    fn mount(&self, request: &MountRequest, fstype: &str) -> HostmountResult<()>;

    /// Mount without a known type, guessing one if the request needs it.
    fn try_mount(&self, request: &MountRequest) -> HostmountResult<()>;
}

/// Requests that act on an existing mount and take no filesystem type.
pub fn needs_no_type(flags: MsFlags) -> bool {
    flags.intersects(
        MsFlags::MS_BIND
            | MsFlags::MS_MOVE
            | MsFlags::MS_REMOUNT
            | MsFlags::MS_SHARED
            | MsFlags::MS_SLAVE
            | MsFlags::MS_PRIVATE
            | MsFlags::MS_UNBINDABLE,
    )
}

/// Ordered candidate list with duplicates removed, first occurrence kept.
pub fn candidate_types<I, S>(types: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for fstype in types {
        let fstype = fstype.into();
        if !out.contains(&fstype) {
            out.push(fstype);
        }
    }
    out
}

/// Try `attempt` for each candidate type in order and return the first that
/// mounts.
pub fn mount_first_candidate<F>(
    request: &MountRequest,
    candidates: &[String],
    mut attempt: F,
) -> HostmountResult<String>
where
    F: FnMut(&str) -> Result<(), Errno>,
{
    if candidates.is_empty() {
        return Err(HostmountError::mount(format!(
            "Failed to mount {} on {}: no filesystem type to try",
            request.device, request.path
        )));
    }

    let mut last_error = Errno::UnknownErrno;
    for fstype in candidates {
        match attempt(fstype) {
            Ok(()) => {
                tracing::debug!(
                    fstype = %fstype,
                    device = %request.device,
                    "Guessed filesystem type"
                );
                return Ok(fstype.clone());
            }
            Err(e) => {
                tracing::debug!(fstype = %fstype, error = %e, "Filesystem type rejected");
                last_error = e;
            }
        }
    }

    Err(HostmountError::mount(format!(
        "Failed to mount {} on {}: tried [{}]: {}",
        request.device,
        request.path,
        candidates.join(" "),
        last_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MountRequest {
        MountRequest {
            device: "/dev/sdb1".into(),
            path: "/mnt".into(),
            fstype: None,
            flags: MsFlags::empty(),
            data: String::new(),
        }
    }

    #[test]
    fn test_needs_no_type() {
        assert!(needs_no_type(MsFlags::MS_BIND));
        assert!(needs_no_type(MsFlags::MS_PRIVATE | MsFlags::MS_REC));
        assert!(needs_no_type(MsFlags::MS_REMOUNT | MsFlags::MS_RDONLY));
        assert!(!needs_no_type(MsFlags::MS_RDONLY | MsFlags::MS_NOEXEC));
        assert!(!needs_no_type(MsFlags::empty()));
    }

    #[test]
    fn test_candidate_types_dedup() {
        let types = candidate_types(["ext4", "xfs", "ext4", "vfat"]);
        assert_eq!(types, vec!["ext4", "xfs", "vfat"]);
    }

    #[test]
    fn test_first_success_wins() {
        let candidates = candidate_types(["ext4", "xfs", "vfat"]);
        let mut tried = Vec::new();
        let chosen = mount_first_candidate(&request(), &candidates, |fstype| {
            tried.push(fstype.to_string());
            if fstype == "xfs" {
                Ok(())
            } else {
                Err(Errno::EINVAL)
            }
        })
        .unwrap();
        assert_eq!(chosen, "xfs");
        assert_eq!(tried, vec!["ext4", "xfs"]);
    }

    #[test]
    fn test_all_candidates_fail() {
        let candidates = candidate_types(["ext4", "vfat"]);
        let err =
            mount_first_candidate(&request(), &candidates, |_| Err(Errno::ENODEV)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tried [ext4 vfat]"));
        assert!(msg.contains("ENODEV"));
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_no_candidates() {
        let err = mount_first_candidate(&request(), &[], |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("no filesystem type"));
    }
}
