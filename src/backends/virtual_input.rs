#![cfg(feature = "virtual")]

//! In-memory input device.
//!
//! [`VirtualSource`] declares a capability set with a builder and then behaves
//! like a kernel node: events fed into it are handed out in batches by
//! `read_events`, and [`disconnect`](VirtualSource::disconnect) makes the next
//! read fail the way an unplugged device does.
//!
//! The source is a cheap handle over shared state. Keep a clone before handing
//! it to [`JoystickDevice::from_source`](crate::JoystickDevice::from_source) and
//! drive the device through that clone:
//!
//! ```
//! use stickpoll::backends::virtual_input::VirtualSource;
//! use stickpoll::{codes, JoystickDevice, PollConfig, PollStatus};
//!
//! let pad = VirtualSource::gamepad("Virtual Pad 0");
//! let mut dev = JoystickDevice::from_source(pad.clone(), PollConfig::default());
//!
//! pad.press_button(codes::BTN_SOUTH);
//! assert_eq!(dev.poll(), PollStatus::Success);
//! assert!(dev.snapshot().buttons()[0]);
//! ```

use crate::codes;
use crate::device::{AbsInfo, DeviceProbe, EventSource};
use crate::event::RawEvent;
use crate::metadata::BusType;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Events handed out per `read_events` call, like one kernel `read()`.
const READ_BATCH: usize = 64;

struct Inner {
    probe: DeviceProbe,
    queue: VecDeque<RawEvent>,
    connected: bool,
}

#[derive(Clone)]
pub struct VirtualSource {
    inner: Arc<Mutex<Inner>>,
    label: String,
}

impl VirtualSource {
    /// A device with no capabilities yet, on the virtual bus.
    pub fn new(name: &str) -> Self {
        let mut probe = DeviceProbe::default();
        probe.identity.name = name.to_string();
        probe.identity.bus = BusType::Virtual;
        probe.identity.driver_version = (1, 0, 1);

        Self {
            inner: Arc::new(Mutex::new(Inner {
                probe,
                queue: VecDeque::new(),
                connected: true,
            })),
            label: format!("virtual:{name}"),
        }
    }

    /// Two sticks, a hat and a face-button cluster.
    pub fn gamepad(name: &str) -> Self {
        let stick = |src: Self, code| src.abs_axis_with(code, -32768, 32767, 16, 128, 0);
        let mut src = Self::new(name).ids(0x045e, 0x028e, 0x0110);
        for code in [codes::ABS_X, codes::ABS_Y, codes::ABS_RX, codes::ABS_RY] {
            src = stick(src, code);
        }
        src.abs_axis(codes::ABS_HAT0X, -1, 1, 0)
            .abs_axis(codes::ABS_HAT0Y, -1, 1, 0)
            .button(codes::BTN_SOUTH)
            .button(codes::BTN_EAST)
            .button(codes::BTN_NORTH)
            .button(codes::BTN_WEST)
            .button(codes::BTN_START)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- builder ---

    pub fn bus(self, bus: BusType) -> Self {
        self.lock().probe.identity.bus = bus;
        self
    }

    pub fn ids(self, vendor_id: u16, product_id: u16, version: u16) -> Self {
        {
            let mut inner = self.lock();
            inner.probe.identity.vendor_id = vendor_id;
            inner.probe.identity.product_id = product_id;
            inner.probe.identity.version = version;
        }
        self
    }

    pub fn rel_axis(self, code: u16) -> Self {
        self.lock().probe.rel_codes.push(code);
        self
    }

    pub fn abs_axis(self, code: u16, minimum: i32, maximum: i32, fuzz: i32) -> Self {
        self.abs_axis_with(code, minimum, maximum, fuzz, 0, 0)
    }

    /// Absolute axis with a dead zone and a resting position.
    pub fn abs_axis_with(
        self,
        code: u16,
        minimum: i32,
        maximum: i32,
        fuzz: i32,
        flat: i32,
        value: i32,
    ) -> Self {
        self.lock().probe.abs.push(AbsInfo {
            code,
            value,
            minimum,
            maximum,
            fuzz,
            flat,
            resolution: 0,
        });
        self
    }

    pub fn button(self, code: u16) -> Self {
        self.lock().probe.key_codes.push(code);
        self
    }

    /// Report `code` as already held when the handle probes the device.
    pub fn held(self, code: u16) -> Self {
        self.lock().probe.pressed_keys.push(code);
        self
    }

    // --- driving ---

    /// Inject a raw event.
    pub fn feed(&self, event: RawEvent) {
        self.lock().queue.push_back(event);
    }

    /// Set an absolute axis and terminate the frame.
    pub fn set_axis(&self, code: u16, value: i32) {
        let mut inner = self.lock();
        inner.queue.push_back(RawEvent::absolute(code, value));
        inner.queue.push_back(RawEvent::sync());
    }

    /// Move a relative axis and terminate the frame.
    pub fn move_axis(&self, code: u16, delta: i32) {
        let mut inner = self.lock();
        inner.queue.push_back(RawEvent::relative(code, delta));
        inner.queue.push_back(RawEvent::sync());
    }

    pub fn press_button(&self, code: u16) {
        let mut inner = self.lock();
        inner.queue.push_back(RawEvent::key(code, 1));
        inner.queue.push_back(RawEvent::sync());
    }

    pub fn release_button(&self, code: u16) {
        let mut inner = self.lock();
        inner.queue.push_back(RawEvent::key(code, 0));
        inner.queue.push_back(RawEvent::sync());
    }

    /// Simulate unplugging. Queued events are lost, as with a real removal.
    pub fn disconnect(&self) {
        let mut inner = self.lock();
        inner.connected = false;
        inner.queue.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Events not yet read.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }
}

fn unplugged() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "virtual device unplugged")
}

impl EventSource for VirtualSource {
    fn probe(&mut self) -> io::Result<DeviceProbe> {
        let inner = self.lock();
        if !inner.connected {
            return Err(unplugged());
        }
        Ok(inner.probe.clone())
    }

    fn read_events(&mut self, out: &mut Vec<RawEvent>) -> io::Result<usize> {
        let mut inner = self.lock();
        if !inner.connected {
            return Err(unplugged());
        }
        if inner.queue.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = inner.queue.len().min(READ_BATCH);
        out.extend(inner.queue.drain(..n));
        Ok(n)
    }

    fn label(&self) -> &str {
        &self.label
    }
}
