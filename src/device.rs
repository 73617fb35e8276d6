//! Kernel boundary.
//!
//! [`EventSource`] is the seam between [`JoystickDevice`](crate::JoystickDevice)
//! and whatever actually owns the device connection. The handle calls
//! [`probe`](EventSource::probe) exactly once while it is being built and then
//! [`read_events`](EventSource::read_events) once per `poll()`.
//!
//! Implementations own their OS resources; dropping the source is what closes
//! the connection, so the handle releases it simply by dropping its box.

use crate::event::RawEvent;
use crate::metadata::DeviceIdentity;
use std::io;

/// Kernel `input_absinfo` for one absolute axis, tagged with its code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbsInfo {
    pub code: u16,
    /// Current position at probe time.
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

/// Everything the one-time capability query returns.
#[derive(Clone, Debug, Default)]
pub struct DeviceProbe {
    pub identity: DeviceIdentity,
    /// Supported `EV_REL` codes.
    pub rel_codes: Vec<u16>,
    /// Supported `EV_ABS` axes with calibration and current value.
    pub abs: Vec<AbsInfo>,
    /// Supported `EV_KEY` codes.
    pub key_codes: Vec<u16>,
    /// Keys held down at probe time (`EVIOCGKEY`).
    pub pressed_keys: Vec<u16>,
}

/// An open connection to one input device.
pub trait EventSource: Send {
    /// One-time identity and capability query.
    fn probe(&mut self) -> io::Result<DeviceProbe>;

    /// Append one batch of already-buffered events to `out` without waiting
    /// for new ones.
    ///
    /// Returns the number appended. `Ok(0)` or `Err(WouldBlock)` both mean
    /// nothing is pending; `Err(Interrupted)` ends the drain early. Any other
    /// error means the connection is gone.
    fn read_events(&mut self, out: &mut Vec<RawEvent>) -> io::Result<usize>;

    /// Short label for log lines (usually the device-node path).
    fn label(&self) -> &str;
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn probe(&mut self) -> io::Result<DeviceProbe> {
        (**self).probe()
    }

    fn read_events(&mut self, out: &mut Vec<RawEvent>) -> io::Result<usize> {
        (**self).read_events(out)
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
