//! Dedicated command switches that map straight to mount flags.

use nix::mount::MsFlags;

/// Convenience switches set directly on the command line.
///
/// Populated once from parsed arguments and passed to the translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountSwitches {
    pub read_only: bool,
    pub bind: bool,
    pub rbind: bool,
    pub make_shared: bool,
    pub make_slave: bool,
    pub make_private: bool,
    pub make_unbindable: bool,
    pub make_rshared: bool,
    pub make_rslave: bool,
    pub make_rprivate: bool,
    pub make_runbindable: bool,
}

impl MountSwitches {
    /// Whether any recursive switch was requested.
    pub fn recursive(&self) -> bool {
        self.rbind
            || self.make_rshared
            || self.make_rslave
            || self.make_rprivate
            || self.make_runbindable
    }

    /// Flag bits implied by the switches.
    ///
    /// Recursion contributes `MS_BIND | MS_REC` once, whichever recursive
    /// switch asked for it.
    pub fn flags(&self) -> MsFlags {
        let mut flags = MsFlags::empty();
        if self.read_only {
            flags |= MsFlags::MS_RDONLY;
        }
        if self.bind || self.rbind {
            flags |= MsFlags::MS_BIND;
        }
        if self.make_shared || self.make_rshared {
            flags |= MsFlags::MS_SHARED;
        }
        if self.make_slave || self.make_rslave {
            flags |= MsFlags::MS_SLAVE;
        }
        if self.make_private || self.make_rprivate {
            flags |= MsFlags::MS_PRIVATE;
        }
        if self.make_unbindable || self.make_runbindable {
            flags |= MsFlags::MS_UNBINDABLE;
        }
        if self.recursive() {
            flags |= MsFlags::MS_BIND | MsFlags::MS_REC;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_switches() {
        assert_eq!(MountSwitches::default().flags(), MsFlags::empty());
    }

    #[test]
    fn test_read_only_and_bind() {
        let switches = MountSwitches {
            read_only: true,
            bind: true,
            ..Default::default()
        };
        assert_eq!(switches.flags(), MsFlags::MS_RDONLY | MsFlags::MS_BIND);
        assert!(!switches.recursive());
    }

    #[test]
    fn test_rbind_alone_sets_bind_and_rec() {
        let switches = MountSwitches {
            rbind: true,
            ..Default::default()
        };
        assert_eq!(switches.flags(), MsFlags::MS_BIND | MsFlags::MS_REC);
    }

    #[test]
    fn test_recursive_propagation_includes_own_bit() {
        let switches = MountSwitches {
            make_rslave: true,
            ..Default::default()
        };
        assert_eq!(
            switches.flags(),
            MsFlags::MS_SLAVE | MsFlags::MS_BIND | MsFlags::MS_REC
        );
    }

    #[test]
    fn test_two_recursive_switches_apply_recursion_once() {
        let switches = MountSwitches {
            rbind: true,
            make_rprivate: true,
            ..Default::default()
        };
        assert_eq!(
            switches.flags(),
            MsFlags::MS_PRIVATE | MsFlags::MS_BIND | MsFlags::MS_REC
        );
    }

    #[test]
    fn test_plain_propagation_switches() {
        let switches = MountSwitches {
            make_shared: true,
            make_unbindable: true,
            ..Default::default()
        };
        assert_eq!(
            switches.flags(),
            MsFlags::MS_SHARED | MsFlags::MS_UNBINDABLE
        );
    }
}
