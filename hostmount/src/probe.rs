//! Kernel-supported filesystem listing.
//!
//! `/proc/filesystems` lists one type per line, optionally prefixed with
//! `nodev` for types that need no backing block device:
//!
//! ```text
//! nodev   sysfs
//! nodev   tmpfs
//!         ext4
//! ```
//!
//! The type name is always the last field of a line.

use std::path::Path;

use hostmount_shared::errors::{HostmountError, HostmountResult};

use crate::constants::procfs::NODEV_MARKER;

/// Filesystem types reported by the kernel, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedFilesystems {
    names: Vec<String>,
    block: Vec<String>,
    known: bool,
}

impl SupportedFilesystems {
    /// Parse listing `contents`, recording whether `query` is among them.
    pub fn parse(contents: &str, query: &str) -> Self {
        let mut list = Self::default();
        for line in contents.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some(name) = fields.last() else {
                continue;
            };
            if *name == query {
                list.known = true;
            }
            if fields.first() != Some(&NODEV_MARKER) {
                list.block.push(name.to_string());
            }
            list.names.push(name.to_string());
        }
        list
    }

    /// Read and parse the listing at `path`.
    pub fn probe(path: &Path, query: &str) -> HostmountResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HostmountError::Probe(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&contents, query))
    }

    /// All type names in listing order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Types that mount from a block device.
    pub fn block_types(&self) -> &[String] {
        &self.block
    }

    /// Whether the queried type was listed.
    pub fn is_known(&self) -> bool {
        self.known
    }
}

/// Diagnostic for an explicit-type mount failure.
///
/// Returns `None` when `fstype` is supported or when the listing cannot be
/// read; a broken listing never makes the original failure worse.
pub fn unknown_filesystem_hint(listing: &Path, fstype: &str) -> Option<String> {
    let supported = match SupportedFilesystems::probe(listing, fstype) {
        Ok(supported) => supported,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unknown filesystem hint");
            return None;
        }
    };
    if supported.is_known() {
        return None;
    }
    Some(format!(
        "unknown filesystem {}. Known are: [{}]",
        fstype,
        supported.names().join(" ")
    ))
}
