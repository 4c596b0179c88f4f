//! Loop device binding.
//!
//! Provides the `LoopBinder` seam used by the option translator and the
//! native `LoopControl` implementation backed by `/dev/loop-control`.
//!
//! Bound loop devices are not released by hostmount. They stay attached until
//! torn down by the kernel or a later tool (e.g. `losetup -d`).

mod native;

use std::path::{Path, PathBuf};

use hostmount_shared::errors::HostmountResult;

pub use native::LoopControl;

/// Binds a backing file to a free loop device.
pub trait LoopBinder {
    /// Attach `backing` to a free loop device and return the device path.
    ///
    /// Failures are `HostmountError::LoopSetup` and are never retried.
    fn bind(&self, backing: &Path) -> HostmountResult<PathBuf>;
}
