//! Error type shared by the handle, the backends and config loading.
//!
//! Construction failures never escape [`JoystickDevice::open`](crate::JoystickDevice::open);
//! they are parked on the invalid handle and readable through
//! [`JoystickDevice::open_error`](crate::JoystickDevice::open_error).
//! Everything else (caller contract violations, config I/O) is returned as `Err`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The device node could not be opened (missing, permission denied, ...).
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The node opened, but an identity or capability query failed.
    #[error("capability query failed: {0}")]
    Probe(#[source] io::Error),

    /// The node reports no relative axes, absolute axes or buttons.
    #[error("device exposes no axes or buttons")]
    NotInputDevice,

    /// No backend is compiled in for this platform / feature set.
    #[error("no input backend available on this platform")]
    Unsupported,

    /// Absolute-axis logical index outside `0..count`.
    #[error("absolute axis {index} out of range (device has {count})")]
    AxisOutOfRange { index: usize, count: usize },

    /// A caller-provided output slice is shorter than the matching count.
    #[error("{what} buffer too small: need {needed}, got {got}")]
    BufferTooSmall {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Checks `got >= needed` for an output slice.
    pub(crate) fn check_len(what: &'static str, needed: usize, got: usize) -> Result<()> {
        if got < needed {
            return Err(Error::BufferTooSmall { what, needed, got });
        }
        Ok(())
    }
}
