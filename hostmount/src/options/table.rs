//! Option token → mount flag table.

use std::collections::HashMap;

use nix::mount::MsFlags;

/// Reserved token that requests loop device setup. Never a table entry.
pub const LOOP_TOKEN: &str = "loop";

/// Immutable mapping from option token to mount flag bits.
///
/// Tokens mapping to the empty set are recognised defaults (`rw`, `exec`, ...)
/// which contribute nothing and are not forwarded as filesystem data.
#[derive(Debug, Clone)]
pub struct KnownOptionTable {
    entries: HashMap<String, MsFlags>,
}

impl KnownOptionTable {
    /// Build a table from explicit entries. A `loop` entry is dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, MsFlags)>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (token, flags) in entries {
            let token = token.into();
            if token == LOOP_TOKEN {
                tracing::warn!("Ignoring option table entry for reserved token \"loop\"");
                continue;
            }
            map.insert(token, flags);
        }
        Self { entries: map }
    }

    /// Standard Linux mount option vocabulary.
    pub fn linux() -> Self {
        Self::from_entries([
            ("ro", MsFlags::MS_RDONLY),
            ("rdonly", MsFlags::MS_RDONLY),
            ("nosuid", MsFlags::MS_NOSUID),
            ("nodev", MsFlags::MS_NODEV),
            ("noexec", MsFlags::MS_NOEXEC),
            ("sync", MsFlags::MS_SYNCHRONOUS),
            ("synchronous", MsFlags::MS_SYNCHRONOUS),
            ("remount", MsFlags::MS_REMOUNT),
            ("mandlock", MsFlags::MS_MANDLOCK),
            ("dirsync", MsFlags::MS_DIRSYNC),
            ("noatime", MsFlags::MS_NOATIME),
            ("nodiratime", MsFlags::MS_NODIRATIME),
            ("bind", MsFlags::MS_BIND),
            ("rbind", MsFlags::MS_BIND | MsFlags::MS_REC),
            ("move", MsFlags::MS_MOVE),
            ("rec", MsFlags::MS_REC),
            ("silent", MsFlags::MS_SILENT),
            ("posixacl", MsFlags::MS_POSIXACL),
            ("unbindable", MsFlags::MS_UNBINDABLE),
            ("runbindable", MsFlags::MS_UNBINDABLE | MsFlags::MS_REC),
            ("private", MsFlags::MS_PRIVATE),
            ("rprivate", MsFlags::MS_PRIVATE | MsFlags::MS_REC),
            ("slave", MsFlags::MS_SLAVE),
            ("rslave", MsFlags::MS_SLAVE | MsFlags::MS_REC),
            ("shared", MsFlags::MS_SHARED),
            ("rshared", MsFlags::MS_SHARED | MsFlags::MS_REC),
            ("relatime", MsFlags::MS_RELATIME),
            ("strictatime", MsFlags::MS_STRICTATIME),
            ("lazytime", MsFlags::MS_LAZYTIME),
            ("iversion", MsFlags::MS_I_VERSION),
            ("i_version", MsFlags::MS_I_VERSION),
            // Default states: recognised, no bits.
            ("rw", MsFlags::empty()),
            ("defaults", MsFlags::empty()),
            ("async", MsFlags::empty()),
            ("atime", MsFlags::empty()),
            ("dev", MsFlags::empty()),
            ("exec", MsFlags::empty()),
            ("suid", MsFlags::empty()),
        ])
    }

    pub fn lookup(&self, token: &str) -> Option<MsFlags> {
        self.entries.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnownOptionTable {
    fn default() -> Self {
        Self::linux()
    }
}
