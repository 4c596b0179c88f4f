//! Mount dispatch and mount table listing.

use std::path::{Path, PathBuf};

use hostmount_shared::errors::{HostmountError, HostmountResult};
use tracing::debug;

use crate::mounter::Mounter;
use crate::options::MountRequest;
use crate::probe::unknown_filesystem_hint;

/// Return the first readable mount table among `candidates`.
pub fn read_mount_table(candidates: &[PathBuf]) -> Option<(PathBuf, String)> {
    candidates.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(contents) => Some((path.clone(), contents)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Mount table unavailable");
            None
        }
    })
}

/// Chooses between the type-guessing and explicit-type mount paths.
pub struct Dispatcher<'a> {
    mounter: &'a dyn Mounter,
    filesystems: &'a Path,
}

impl<'a> Dispatcher<'a> {
    /// `filesystems` is the supported-filesystems listing used for hints.
    pub fn new(mounter: &'a dyn Mounter, filesystems: &'a Path) -> Self {
        Self {
            mounter,
            filesystems,
        }
    }

    /// Perform the mount described by `request`.
    ///
    /// Explicit-type failures carry an unknown-filesystem hint when the type
    /// is not among the kernel-supported ones.
    pub fn dispatch(&self, request: &MountRequest) -> HostmountResult<()> {
        match request.fstype.as_deref() {
            None => self.mounter.try_mount(request),
            Some(fstype) => self
                .mounter
                .mount(request, fstype)
                .map_err(|e| self.attach_hint(e, fstype)),
        }
    }

    fn attach_hint(&self, err: HostmountError, fstype: &str) -> HostmountError {
        match err {
            HostmountError::Mount {
                message,
                hint: None,
            } => HostmountError::Mount {
                message,
                hint: unknown_filesystem_hint(self.filesystems, fstype),
            },
            other => other,
        }
    }
}
