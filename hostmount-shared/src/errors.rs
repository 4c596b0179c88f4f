//! Error taxonomy for a single mount invocation.

use thiserror::Error;

/// Result alias used throughout hostmount.
pub type HostmountResult<T> = Result<T, HostmountError>;

#[derive(Debug, Error)]
pub enum HostmountError {
    /// Bad command line. Nothing was mounted.
    #[error("{0}")]
    Usage(String),

    /// Loop device allocation or file binding failed. Fatal, no mount attempted.
    #[error("loop device setup failed: {0}")]
    LoopSetup(String),

    /// mount(2) failed.
    ///
    /// `hint` carries the best-effort unknown-filesystem diagnostic and is
    /// deliberately kept out of the `Display` output so callers can print it
    /// on its own line.
    #[error("{message}")]
    Mount {
        message: String,
        hint: Option<String>,
    },

    /// The supported-filesystems listing could not be read.
    #[error("filesystem probe failed: {0}")]
    Probe(String),
}

impl HostmountError {
    /// Build a mount error without a hint.
    pub fn mount(message: impl Into<String>) -> Self {
        HostmountError::Mount {
            message: message.into(),
            hint: None,
        }
    }

    /// Hint attached to a mount failure, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            HostmountError::Mount { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, HostmountError::Usage(_))
    }
}
