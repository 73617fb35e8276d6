#![cfg(all(feature = "evdev", target_os = "linux"))]

//! Linux evdev backend.
//!
//! [`EvdevSource`] wraps an `evdev::Device` opened on a `/dev/input/event*` node.
//! It is responsible for:
//! - opening the node read-write, falling back to read-only (done by `evdev::Device::open`)
//! - switching the descriptor to `O_NONBLOCK` so a drain never waits on the kernel
//! - the one-time identity / capability / absinfo / key-state query
//! - converting `evdev::InputEvent` into [`RawEvent`]
//!
//! `evdev` also resynchronizes after `SYN_DROPPED` by synthesizing the missed
//! key and absolute changes, so a slow poller still converges on the true state.
//!
//! The file descriptor is owned by the `evdev::Device`; dropping the source closes it.

use crate::device::{AbsInfo, DeviceProbe, EventSource};
use crate::error::{Error, Result};
use crate::event::{EventType, RawEvent};
use crate::metadata::{BusType, DeviceIdentity};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

/// An open evdev node.
pub struct EvdevSource {
    device: ::evdev::Device,
    path: String,
}

impl EvdevSource {
    /// Open `path` and put it in non-blocking mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        let device = ::evdev::Device::open(path).map_err(open_err)?;
        set_nonblocking(device.as_raw_fd()).map_err(open_err)?;

        Ok(Self {
            device,
            path: path.display().to_string(),
        })
    }
}

impl EventSource for EvdevSource {
    fn probe(&mut self) -> io::Result<DeviceProbe> {
        let dev = &self.device;
        let id = dev.input_id();

        let identity = DeviceIdentity {
            name: dev.name().unwrap_or_default().to_owned(),
            bus: BusType::from_raw(id.bus_type().0),
            vendor_id: id.vendor(),
            product_id: id.product(),
            version: id.version(),
            phys: dev.physical_path().map(str::to_owned),
            uniq: dev.unique_name().map(str::to_owned),
            driver_version: dev.driver_version(),
        };

        let rel_codes: Vec<u16> = dev
            .supported_relative_axes()
            .map(|axes| axes.iter().map(|axis| axis.0).collect())
            .unwrap_or_default();

        let key_codes: Vec<u16> = dev
            .supported_keys()
            .map(|keys| keys.iter().map(|key| key.code()).collect())
            .unwrap_or_default();

        let abs = match dev.supported_absolute_axes() {
            Some(axes) => {
                let state = dev.get_abs_state()?;
                axes.iter()
                    .filter_map(|axis| {
                        let info = state.get(axis.0 as usize)?;
                        Some(AbsInfo {
                            code: axis.0,
                            value: info.value,
                            minimum: info.minimum,
                            maximum: info.maximum,
                            fuzz: info.fuzz,
                            flat: info.flat,
                            resolution: info.resolution,
                        })
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let pressed_keys = if key_codes.is_empty() {
            Vec::new()
        } else {
            dev.get_key_state()?.iter().map(|key| key.code()).collect()
        };

        Ok(DeviceProbe {
            identity,
            rel_codes,
            abs,
            key_codes,
            pressed_keys,
        })
    }

    fn read_events(&mut self, out: &mut Vec<RawEvent>) -> io::Result<usize> {
        let before = out.len();
        // Consume the whole batch: events left in evdev's buffer would only
        // resurface after the next kernel read.
        for ev in self.device.fetch_events()? {
            out.push(RawEvent {
                time: ev.timestamp(),
                kind: EventType::from_raw(ev.event_type().0),
                code: ev.code(),
                value: ev.value(),
            });
        }
        Ok(out.len() - before)
    }

    fn label(&self) -> &str {
        &self.path
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: `fd` belongs to a live `evdev::Device` for the whole call; F_GETFL/F_SETFL
    // only touch the descriptor's status flags.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_node_is_an_open_error() {
        let err = EvdevSource::open("/dev/input/event-does-not-exist").err().unwrap();
        match err {
            Error::Open { path, source } => {
                assert_eq!(path, Path::new("/dev/input/event-does-not-exist"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[ignore] // Requires a readable joystick at /dev/input/event0 (run with: cargo test -- --ignored)
    fn probe_real_device() {
        let mut source = EvdevSource::open("/dev/input/event0").unwrap();
        let probe = source.probe().unwrap();
        assert!(!probe.identity.name.is_empty());
        let mut buf = Vec::new();
        match source.read_events(&mut buf) {
            Ok(_) => {}
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::WouldBlock),
        }
    }
}
