//! Option translation: tokens and switches → mount request.

use std::path::Path;

use hostmount_shared::errors::HostmountResult;
use nix::mount::MsFlags;
use tracing::debug;

use super::{KnownOptionTable, LOOP_TOKEN, MountOptionSet, MountSwitches};
use crate::loopdev::LoopBinder;

/// Fully translated mount call parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    /// Source device; replaced by the loop device when `loop` was requested.
    pub device: String,
    /// Mount point.
    pub path: String,
    /// Explicit filesystem type; `None` selects the type-guessing mount.
    pub fstype: Option<String>,
    /// OR-accumulated mount flags.
    pub flags: MsFlags,
    /// Unrecognised tokens, comma-joined in their original order.
    pub data: String,
}

/// Walks option tokens and switches to build a `MountRequest`.
pub struct OptionTranslator<'a> {
    table: &'a KnownOptionTable,
    binder: &'a dyn LoopBinder,
}

impl<'a> OptionTranslator<'a> {
    pub fn new(table: &'a KnownOptionTable, binder: &'a dyn LoopBinder) -> Self {
        Self { table, binder }
    }

    /// Translate one invocation.
    ///
    /// Tokens are processed in order: `loop` binds the current device to a
    /// loop device and substitutes it, known tokens OR their bits in, and
    /// everything else becomes filesystem data. Switch bits are applied
    /// afterwards. A loop setup failure aborts translation.
    pub fn translate(
        &self,
        device: &str,
        path: &str,
        fstype: Option<&str>,
        options: &MountOptionSet,
        switches: &MountSwitches,
    ) -> HostmountResult<MountRequest> {
        let mut device = device.to_string();
        let mut flags = MsFlags::empty();
        let mut data: Vec<&str> = Vec::new();

        for token in options.iter() {
            if token == LOOP_TOKEN {
                let loop_device = self.binder.bind(Path::new(&device))?;
                debug!(
                    backing = %device,
                    loop_device = %loop_device.display(),
                    "Bound backing file to loop device"
                );
                device = loop_device.to_string_lossy().into_owned();
                continue;
            }
            match self.table.lookup(token) {
                Some(bits) => flags |= bits,
                None => data.push(token),
            }
        }

        flags |= switches.flags();

        let request = MountRequest {
            device,
            path: path.to_string(),
            fstype: fstype.map(str::to_string),
            flags,
            data: data.join(","),
        };

        debug!(
            device = %request.device,
            path = %request.path,
            fstype = ?request.fstype,
            options = %options,
            flags = ?request.flags,
            data = %request.data,
            "Translated mount options"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostmount_shared::errors::HostmountError;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct MockBinder {
        calls: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl MockBinder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl LoopBinder for MockBinder {
        fn bind(&self, backing: &Path) -> HostmountResult<PathBuf> {
            self.calls.borrow_mut().push(backing.to_path_buf());
            if self.fail {
                return Err(HostmountError::LoopSetup("no free loop device".into()));
            }
            Ok(PathBuf::from(format!("/dev/loop{}", self.calls.borrow().len() - 1)))
        }
    }

    fn translate(
        options: &[&str],
        switches: MountSwitches,
        binder: &MockBinder,
    ) -> HostmountResult<MountRequest> {
        let table = KnownOptionTable::linux();
        let set = MountOptionSet::from_values(options);
        OptionTranslator::new(&table, binder).translate(
            "/dev/sda1",
            "/mnt",
            None,
            &set,
            &switches,
        )
    }

    #[test]
    fn test_no_options() {
        let binder = MockBinder::new();
        let req = translate(&[], MountSwitches::default(), &binder).unwrap();
        assert_eq!(req.device, "/dev/sda1");
        assert_eq!(req.path, "/mnt");
        assert_eq!(req.fstype, None);
        assert_eq!(req.flags, MsFlags::empty());
        assert_eq!(req.data, "");
        assert!(binder.calls.borrow().is_empty());
    }

    #[test]
    fn test_known_tokens_are_order_independent() {
        let binder = MockBinder::new();
        let a = translate(&["ro,nosuid,noexec"], MountSwitches::default(), &binder).unwrap();
        let b = translate(&["noexec", "nosuid,ro"], MountSwitches::default(), &binder).unwrap();
        let expected = MsFlags::MS_RDONLY | MsFlags::MS_NOSUID | MsFlags::MS_NOEXEC;
        assert_eq!(a.flags, expected);
        assert_eq!(b.flags, expected);
        assert_eq!(a.data, "");
    }

    #[test]
    fn test_unknown_tokens_become_data_in_order() {
        let binder = MockBinder::new();
        let req = translate(
            &["size=10m,ro", "mode=0755", "nosuid,uid=1000"],
            MountSwitches::default(),
            &binder,
        )
        .unwrap();
        assert_eq!(req.data, "size=10m,mode=0755,uid=1000");
        assert_eq!(req.flags, MsFlags::MS_RDONLY | MsFlags::MS_NOSUID);
    }

    #[test]
    fn test_repeated_tokens_are_idempotent() {
        let binder = MockBinder::new();
        let req = translate(&["ro,ro", "ro"], MountSwitches::default(), &binder).unwrap();
        assert_eq!(req.flags, MsFlags::MS_RDONLY);
    }

    #[test]
    fn test_loop_substitutes_device() {
        let binder = MockBinder::new();
        let table = KnownOptionTable::linux();
        let set = MountOptionSet::from_values(["loop"]);
        let switches = MountSwitches {
            read_only: true,
            ..Default::default()
        };
        let req = OptionTranslator::new(&table, &binder)
            .translate("backing.img", "/mnt", None, &set, &switches)
            .unwrap();

        assert_eq!(*binder.calls.borrow(), vec![PathBuf::from("backing.img")]);
        assert_eq!(req.device, "/dev/loop0");
        assert_eq!(req.flags, MsFlags::MS_RDONLY);
        assert_eq!(req.data, "");
    }

    #[test]
    fn test_empty_tokens_reach_data() {
        let binder = MockBinder::new();
        let req = translate(&["a,,b"], MountSwitches::default(), &binder).unwrap();
        assert_eq!(req.data, "a,,b");
        assert_eq!(req.flags, MsFlags::empty());
    }

    #[test]
    fn test_stacked_loops_bind_previous_loop_device() {
        let binder = MockBinder::new();
        let table = KnownOptionTable::linux();
        let set = MountOptionSet::from_values(["loop,loop"]);
        let req = OptionTranslator::new(&table, &binder)
            .translate("img", "/mnt", None, &set, &MountSwitches::default())
            .unwrap();

        assert_eq!(
            *binder.calls.borrow(),
            vec![PathBuf::from("img"), PathBuf::from("/dev/loop0")]
        );
        assert_eq!(req.device, "/dev/loop1");
    }

    #[test]
    fn test_loop_failure_aborts() {
        let binder = MockBinder::failing();
        let err = translate(&["loop,ro"], MountSwitches::default(), &binder).unwrap_err();
        assert!(matches!(err, HostmountError::LoopSetup(_)));
        assert_eq!(binder.calls.borrow().len(), 1);
    }

    #[test]
    fn test_loop_token_intercepted_before_table() {
        let table = KnownOptionTable::from_entries([("loop", MsFlags::MS_NOEXEC)]);
        let binder = MockBinder::new();
        let set = MountOptionSet::from_values(["loop"]);
        let req = OptionTranslator::new(&table, &binder)
            .translate("disk.img", "/mnt", None, &set, &MountSwitches::default())
            .unwrap();
        assert_eq!(req.flags, MsFlags::empty());
        assert_eq!(binder.calls.borrow().len(), 1);
    }

    #[test]
    fn test_switches_combine_with_tokens() {
        let binder = MockBinder::new();
        let switches = MountSwitches {
            rbind: true,
            make_rshared: true,
            ..Default::default()
        };
        let req = translate(&["nodev"], switches, &binder).unwrap();
        assert_eq!(
            req.flags,
            MsFlags::MS_NODEV | MsFlags::MS_SHARED | MsFlags::MS_BIND | MsFlags::MS_REC
        );
    }

    #[test]
    fn test_explicit_type_is_carried() {
        let table = KnownOptionTable::linux();
        let binder = MockBinder::new();
        let req = OptionTranslator::new(&table, &binder)
            .translate(
                "none",
                "/tmp/x",
                Some("tmpfs"),
                &MountOptionSet::from_values(["size=1m"]),
                &MountSwitches::default(),
            )
            .unwrap();
        assert_eq!(req.fstype.as_deref(), Some("tmpfs"));
        assert_eq!(req.data, "size=1m");
    }
}
