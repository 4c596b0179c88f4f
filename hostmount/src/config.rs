//! Host path configuration.

use std::path::{Path, PathBuf};

use crate::constants::{loop_dev, procfs};

/// Locations of the host files and devices hostmount reads.
///
/// The defaults are the fixed Linux locations. Every path can be overridden,
/// which is how tests point the tool at temporary files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    /// Mount table listings, tried in order.
    pub mount_tables: Vec<PathBuf>,
    /// Supported filesystem listing.
    pub filesystems: PathBuf,
    /// Loop control device.
    pub loop_control: PathBuf,
    /// Prefix of loop device nodes.
    pub loop_device_prefix: String,
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            mount_tables: procfs::MOUNT_TABLES.iter().map(PathBuf::from).collect(),
            filesystems: PathBuf::from(procfs::FILESYSTEMS),
            loop_control: PathBuf::from(loop_dev::CONTROL_PATH),
            loop_device_prefix: loop_dev::DEVICE_PREFIX.to_string(),
        }
    }
}

impl HostPaths {
    pub fn with_mount_tables<I, P>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.mount_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filesystems(mut self, path: impl Into<PathBuf>) -> Self {
        self.filesystems = path.into();
        self
    }

    pub fn with_loop_control(mut self, path: impl Into<PathBuf>, device_prefix: &str) -> Self {
        self.loop_control = path.into();
        self.loop_device_prefix = device_prefix.to_string();
        self
    }

    /// Path of loop device number `index`.
    pub fn loop_device(&self, index: u32) -> PathBuf {
        PathBuf::from(format!("{}{}", self.loop_device_prefix, index))
    }

    pub fn filesystems_path(&self) -> &Path {
        &self.filesystems
    }
}
