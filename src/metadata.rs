//! Device identity.
//!
//! [`DeviceIdentity`] is queried once when the handle is built and never
//! changes afterward. It is cloneable and serde-friendly for UI display,
//! logging and diagnostics reports.
//!
//! ## Persistence notes
//! - `vendor_id`/`product_id` and `uniq` (when present) are generally stable and useful
//!   for re-identification.
//! - `phys` is a topology path (e.g. `usb-0000:00:14.0-2/input0`) that changes across
//!   ports; treat it as diagnostic first, identity second.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport the device is attached through (`input_id.bustype`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusType {
    /// Bus 0, or the neutral value reported by an invalid handle.
    #[default]
    Unknown,
    Pci,
    Usb,
    Hil,
    Bluetooth,
    Virtual,
    I8042,
    Rs232,
    Gameport,
    I2c,
    Host,
    Spi,
    Other(u16),
}

impl BusType {
    pub fn from_raw(bus: u16) -> Self {
        match bus {
            0x00 => BusType::Unknown,
            0x01 => BusType::Pci,
            0x03 => BusType::Usb,
            0x04 => BusType::Hil,
            0x05 => BusType::Bluetooth,
            0x06 => BusType::Virtual,
            0x11 => BusType::I8042,
            0x13 => BusType::Rs232,
            0x14 => BusType::Gameport,
            0x18 => BusType::I2c,
            0x19 => BusType::Host,
            0x1c => BusType::Spi,
            other => BusType::Other(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            BusType::Unknown => 0x00,
            BusType::Pci => 0x01,
            BusType::Usb => 0x03,
            BusType::Hil => 0x04,
            BusType::Bluetooth => 0x05,
            BusType::Virtual => 0x06,
            BusType::I8042 => 0x11,
            BusType::Rs232 => 0x13,
            BusType::Gameport => 0x14,
            BusType::I2c => 0x18,
            BusType::Host => 0x19,
            BusType::Spi => 0x1c,
            BusType::Other(bus) => bus,
        }
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::Unknown => f.write_str("unknown"),
            BusType::Pci => f.write_str("pci"),
            BusType::Usb => f.write_str("usb"),
            BusType::Hil => f.write_str("hil"),
            BusType::Bluetooth => f.write_str("bluetooth"),
            BusType::Virtual => f.write_str("virtual"),
            BusType::I8042 => f.write_str("i8042"),
            BusType::Rs232 => f.write_str("rs232"),
            BusType::Gameport => f.write_str("gameport"),
            BusType::I2c => f.write_str("i2c"),
            BusType::Host => f.write_str("host"),
            BusType::Spi => f.write_str("spi"),
            BusType::Other(bus) => write!(f, "bus-0x{bus:02x}"),
        }
    }
}

/// Coarse device classification guessed from name and capabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Mouse,
    Keyboard,
    Gamepad,
    Stick,
    #[default]
    Unknown,
}

/// Immutable identity of an opened device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Kernel-reported device name (`EVIOCGNAME`). Empty if the driver set none.
    pub name: String,
    pub bus: BusType,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Product/firmware version from `input_id.version`.
    pub version: u16,
    /// Physical topology path (`EVIOCGPHYS`), if reported.
    pub phys: Option<String>,
    /// Unique identifier (`EVIOCGUNIQ`), often a serial or MAC, if reported.
    pub uniq: Option<String>,
    /// evdev protocol version `(major, minor, patch)`.
    pub driver_version: (u8, u8, u8),
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} {:04x}:{:04x} v{:04x}]",
            self.name, self.bus, self.vendor_id, self.product_id, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_roundtrips_known_and_unknown_values() {
        for raw in [0x00u16, 0x03, 0x05, 0x06, 0x14, 0x1c, 0x42] {
            assert_eq!(BusType::from_raw(raw).raw(), raw);
        }
        assert_eq!(BusType::from_raw(0x03), BusType::Usb);
        assert_eq!(BusType::from_raw(0x42), BusType::Other(0x42));
    }

    #[test]
    fn identity_display() {
        let id = DeviceIdentity {
            name: "Logitech Extreme 3D".into(),
            bus: BusType::Usb,
            vendor_id: 0x046d,
            product_id: 0xc215,
            version: 0x0110,
            ..Default::default()
        };
        assert_eq!(id.to_string(), "Logitech Extreme 3D [usb 046d:c215 v0110]");
    }
}
