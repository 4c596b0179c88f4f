//! hostmount attaches filesystems, bind mounts and loop-backed images into the
//! host mount namespace.
//!
//! ## Flow
//!
//! ```text
//! MountArgs ──► MountOptionSet + MountSwitches
//!                     │
//!                     ▼
//!             OptionTranslator ──(loop)──► LoopBinder
//!                     │
//!                     ▼ MountRequest
//!                 Dispatcher ──► Mounter
//!                                   │ explicit type fails
//!                                   ▼
//!                          SupportedFilesystems
//! ```

#[cfg(not(target_os = "linux"))]
compile_error!("hostmount only supports Linux");

pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod loopdev;
pub mod mounter;
pub mod options;
pub mod probe;

pub use cli::{Host, MountArgs, Outcome, parse_args, run};
pub use config::HostPaths;
pub use dispatch::{Dispatcher, read_mount_table};
pub use hostmount_shared::errors::{HostmountError, HostmountResult};
pub use loopdev::{LoopBinder, LoopControl};
pub use mounter::{Mounter, NativeMounter};
pub use options::{
    KnownOptionTable, MountOptionSet, MountRequest, MountSwitches, OptionTranslator,
};
pub use probe::SupportedFilesystems;
