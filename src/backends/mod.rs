//! Input backends for `stickpoll`.
//!
//! Implementations of [`EventSource`](crate::device::EventSource) for concrete
//! device connections.
//!
//! # Feature flags
//! - **`evdev`**: enables the Linux evdev backend ([`linux::EvdevSource`]). Default.
//! - **`virtual`**: enables the in-memory backend ([`virtual_input::VirtualSource`]). Default.
//!
//! stickpoll reads input devices; it does not create virtual kernel devices (uinput).

use crate::device::EventSource;
use crate::error::Result;
use std::path::Path;

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
pub mod linux;

#[cfg(feature = "virtual")]
#[cfg_attr(docsrs, doc(cfg(feature = "virtual")))]
pub mod virtual_input;

/// Open a device node with the platform backend.
///
/// Returns [`Error::Unsupported`](crate::Error::Unsupported) when no backend is
/// compiled in for this target.
pub fn open_source(path: &Path) -> Result<Box<dyn EventSource>> {
    #[cfg(all(feature = "evdev", target_os = "linux"))]
    {
        Ok(Box::new(linux::EvdevSource::open(path)?))
    }

    #[cfg(not(all(feature = "evdev", target_os = "linux")))]
    {
        let _ = path;
        Err(crate::error::Error::Unsupported)
    }
}
