//! Types shared between the hostmount library and its binary.

pub mod errors;

pub use errors::{HostmountError, HostmountResult};
