//! Filesystem detection from superblock magic.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::constants::superblock::PROBE_LEN;

struct Magic {
    offset: usize,
    bytes: &'static [u8],
    fstype: &'static str,
}

impl Magic {
    const fn new(offset: usize, bytes: &'static [u8], fstype: &'static str) -> Self {
        Self {
            offset,
            bytes,
            fstype,
        }
    }
}

// ext2/3 images mount through the ext4 driver.
const MAGICS: &[Magic] = &[
    Magic::new(0, b"hsqs", "squashfs"),
    Magic::new(0, b"XFSB", "xfs"),
    Magic::new(0x400, &[0xe2, 0xe1, 0xf5, 0xe0], "erofs"),
    Magic::new(0x438, &[0x53, 0xef], "ext4"),
    Magic::new(0x10040, b"_BHRfS_M", "btrfs"),
    Magic::new(0x8001, b"CD001", "iso9660"),
    Magic::new(0x52, b"FAT32   ", "vfat"),
    Magic::new(0x36, b"FAT16   ", "vfat"),
    Magic::new(0x36, b"FAT12   ", "vfat"),
];

/// Identify a filesystem from the first bytes of a device.
pub fn identify(head: &[u8]) -> Option<&'static str> {
    MAGICS
        .iter()
        .find(|m| head.get(m.offset..m.offset + m.bytes.len()) == Some(m.bytes))
        .map(|m| m.fstype)
}

/// Read the head of `device` and identify its filesystem.
///
/// Unreadable devices simply yield `None`.
pub fn detect_filesystem(device: &Path) -> Option<&'static str> {
    let mut head = Vec::with_capacity(PROBE_LEN);
    let read = File::open(device).and_then(|f| f.take(PROBE_LEN as u64).read_to_end(&mut head));
    if let Err(e) = read {
        tracing::debug!(device = %device.display(), error = %e, "Superblock probe skipped");
        return None;
    }
    identify(&head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn image_with(offset: usize, bytes: &[u8]) -> Vec<u8> {
        let mut img = vec![0u8; PROBE_LEN];
        img[offset..offset + bytes.len()].copy_from_slice(bytes);
        img
    }

    #[test]
    fn test_identify_ext4() {
        assert_eq!(identify(&image_with(0x438, &[0x53, 0xef])), Some("ext4"));
    }

    #[test]
    fn test_identify_squashfs_and_btrfs() {
        assert_eq!(identify(&image_with(0, b"hsqs")), Some("squashfs"));
        assert_eq!(identify(&image_with(0x10040, b"_BHRfS_M")), Some("btrfs"));
    }

    #[test]
    fn test_identify_vfat() {
        assert_eq!(identify(&image_with(0x52, b"FAT32   ")), Some("vfat"));
        assert_eq!(identify(&image_with(0x36, b"FAT16   ")), Some("vfat"));
    }

    #[test]
    fn test_identify_unknown_and_short() {
        assert_eq!(identify(&vec![0u8; PROBE_LEN]), None);
        // Too short to reach the ext magic.
        assert_eq!(identify(&[0u8; 16]), None);
    }

    #[test]
    fn test_detect_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&image_with(0x8001, b"CD001")).unwrap();
        assert_eq!(detect_filesystem(file.path()), Some("iso9660"));
    }

    #[test]
    fn test_detect_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect_filesystem(&dir.path().join("sdz")), None);
    }
}
