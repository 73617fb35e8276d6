//! Per-poll snapshot of one device's channel values.
//!
//! [`Snapshot`] is the only mutable part of a [`JoystickDevice`](crate::JoystickDevice).
//! Callers never get a reference into the live one: they copy it out with
//! `get_polled_data` or take an owned clone with `snapshot()`, so a reader can
//! never observe a half-folded poll cycle.
//!
//! # Semantics
//! - `rel[i]`: motion accumulated on relative axis `i` during the last `poll()`.
//!   Reset to 0 at the start of every poll.
//! - `abs[i]`: last known position of absolute axis `i`. Persists until a new event.
//! - `buttons[i]`: last known state of button `i`. Persists until a new event.
//!
//! # Example
//! ```no_run
//! use stickpoll::JoystickDevice;
//!
//! let mut dev = JoystickDevice::open("/dev/input/event7");
//! dev.poll();
//! let snap = dev.snapshot();
//! println!("X={:?} trigger={:?}", snap.abs().first(), snap.buttons().first());
//! ```

use crate::capability::CapabilityTables;
use crate::config::InitialState;
use crate::device::DeviceProbe;

/// Owned channel values in logical-index order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) rel: Vec<i32>,
    pub(crate) abs: Vec<i32>,
    pub(crate) buttons: Vec<bool>,
}

impl Snapshot {
    /// Size a snapshot for `caps` and seed it per `initial`.
    pub(crate) fn seeded(caps: &CapabilityTables, probe: &DeviceProbe, initial: InitialState) -> Self {
        let mut snap = Snapshot {
            rel: vec![0; caps.rel_axes().len()],
            abs: vec![0; caps.abs_axes().len()],
            buttons: vec![false; caps.buttons().len()],
        };

        if initial == InitialState::DeviceReported {
            for info in &probe.abs {
                if let Some(i) = caps.abs_index(info.code) {
                    snap.abs[i] = info.value;
                }
            }
            for &code in &probe.pressed_keys {
                if let Some(i) = caps.button_index(code) {
                    snap.buttons[i] = true;
                }
            }
        }
        snap
    }

    #[inline]
    pub fn rel(&self) -> &[i32] {
        &self.rel
    }

    #[inline]
    pub fn abs(&self) -> &[i32] {
        &self.abs
    }

    #[inline]
    pub fn buttons(&self) -> &[bool] {
        &self.buttons
    }

    /// `true` if any button is currently held.
    pub fn any_pressed(&self) -> bool {
        self.buttons.iter().any(|&b| b)
    }

    pub(crate) fn reset_rel(&mut self) {
        self.rel.iter_mut().for_each(|d| *d = 0);
    }
}
