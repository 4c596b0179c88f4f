//! Native loop device binding using loop-control ioctls.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use hostmount_shared::errors::{HostmountError, HostmountResult};
use tracing::debug;

use super::LoopBinder;
use crate::config::HostPaths;
use crate::constants::loop_dev::{LOOP_CTL_GET_FREE, LOOP_SET_FD};

/// Allocates loop devices through the loop-control device.
#[derive(Debug, Clone)]
pub struct LoopControl {
    paths: HostPaths,
}

impl LoopControl {
    pub fn new(paths: &HostPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }

    /// Find (allocating if needed) an unbound loop device.
    pub fn find_device(&self) -> HostmountResult<PathBuf> {
        let control = File::open(&self.paths.loop_control).map_err(|e| {
            HostmountError::LoopSetup(format!(
                "Failed to open loop control {}: {}",
                self.paths.loop_control.display(),
                e
            ))
        })?;

        let index = unsafe { libc::ioctl(control.as_raw_fd(), LOOP_CTL_GET_FREE as _) };
        if index < 0 {
            return Err(HostmountError::LoopSetup(format!(
                "Failed to find a free loop device: {}",
                io::Error::last_os_error()
            )));
        }

        Ok(self.paths.loop_device(index as u32))
    }

    /// Attach `backing` to the loop device at `device`.
    pub fn set_file(&self, device: &Path, backing: &Path) -> HostmountResult<()> {
        let file = open_backing(backing)?;
        let loop_dev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .map_err(|e| {
                HostmountError::LoopSetup(format!(
                    "Failed to open loop device {}: {}",
                    device.display(),
                    e
                ))
            })?;

        let rc = unsafe {
            libc::ioctl(
                loop_dev.as_raw_fd(),
                LOOP_SET_FD as _,
                file.as_raw_fd() as libc::c_ulong,
            )
        };
        if rc < 0 {
            return Err(HostmountError::LoopSetup(format!(
                "Failed to bind {} to {}: {}",
                backing.display(),
                device.display(),
                io::Error::last_os_error()
            )));
        }
        Ok(())
    }
}

impl LoopBinder for LoopControl {
    fn bind(&self, backing: &Path) -> HostmountResult<PathBuf> {
        let device = self.find_device()?;
        self.set_file(&device, backing)?;
        debug!(
            backing = %backing.display(),
            device = %device.display(),
            "Loop device attached"
        );
        Ok(device)
    }
}

/// Open the backing file read-write, falling back to read-only when the file
/// or its filesystem refuses writes.
fn open_backing(backing: &Path) -> HostmountResult<File> {
    let rw = OpenOptions::new().read(true).write(true).open(backing);
    let err = match rw {
        Ok(file) => return Ok(file),
        Err(e) => e,
    };

    let read_only_fallback = matches!(
        err.raw_os_error(),
        Some(libc::EACCES) | Some(libc::EROFS) | Some(libc::EPERM)
    );
    if !read_only_fallback {
        return Err(backing_error(backing, err));
    }

    debug!(backing = %backing.display(), "Backing file not writable, attaching read-only");
    File::open(backing).map_err(|e| backing_error(backing, e))
}

fn backing_error(backing: &Path, e: io::Error) -> HostmountError {
    HostmountError::LoopSetup(format!(
        "Failed to open backing file {}: {}",
        backing.display(),
        e
    ))
}
