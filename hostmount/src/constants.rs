//! Host interface constants.
//!
//! Centralized location for the fixed kernel paths and ioctl numbers hostmount
//! relies on.

/// Kernel-exposed listings
pub mod procfs {
    /// Mount table candidates, highest priority first
    pub const MOUNT_TABLES: [&str; 3] = ["/proc/self/mounts", "/proc/mounts", "/etc/mtab"];

    /// Filesystem types registered with the kernel
    pub const FILESYSTEMS: &str = "/proc/filesystems";

    /// Marker preceding filesystem types that need no backing block device
    pub const NODEV_MARKER: &str = "nodev";
}

/// Loop device interface (linux/loop.h)
pub mod loop_dev {
    /// Control device used to allocate free loop devices
    pub const CONTROL_PATH: &str = "/dev/loop-control";

    /// Loop device nodes are `<PREFIX><N>`
    pub const DEVICE_PREFIX: &str = "/dev/loop";

    /// Associate an open file descriptor with the loop device
    pub const LOOP_SET_FD: u64 = 0x4C00;

    /// Return the index of the first unbound loop device, allocating one if needed
    pub const LOOP_CTL_GET_FREE: u64 = 0x4C82;
}

/// Superblock probing for the type-guessing mount
pub mod superblock {
    /// Bytes read from the head of a device; covers the btrfs superblock at 64KiB
    pub const PROBE_LEN: usize = 0x10048;
}
