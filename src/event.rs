//! Raw kernel events and channel descriptions.
//!
//! A [`RawEvent`] is one `struct input_event` record as read from an evdev node:
//! timestamp, type tag, code and value. The translator folds batches of them into
//! the handle's [`Snapshot`](crate::snapshot::Snapshot); it never hands them to
//! callers directly.
//!
//! ## Value conventions
//! - **Relative axes:** signed motion since the previous event.
//! - **Absolute axes:** current position in the axis' `[min, max]` range.
//! - **Keys/buttons:** `0` released, `1` pressed, `2` autorepeat (treated as pressed).

use crate::codes;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Event category, decoded from the kernel's `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Sync,
    Key,
    Relative,
    Absolute,
    /// Any type this crate does not interpret (`EV_MSC`, `EV_LED`, ...).
    Other(u16),
}

impl EventType {
    pub fn from_raw(ty: u16) -> Self {
        match ty {
            codes::EV_SYN => EventType::Sync,
            codes::EV_KEY => EventType::Key,
            codes::EV_REL => EventType::Relative,
            codes::EV_ABS => EventType::Absolute,
            other => EventType::Other(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            EventType::Sync => codes::EV_SYN,
            EventType::Key => codes::EV_KEY,
            EventType::Relative => codes::EV_REL,
            EventType::Absolute => codes::EV_ABS,
            EventType::Other(ty) => ty,
        }
    }
}

/// One kernel event record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEvent {
    pub time: SystemTime,
    pub kind: EventType,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    /// Build an event stamped with the current time.
    pub fn now(kind: EventType, code: u16, value: i32) -> Self {
        Self {
            time: SystemTime::now(),
            kind,
            code,
            value,
        }
    }

    pub fn relative(code: u16, value: i32) -> Self {
        Self::now(EventType::Relative, code, value)
    }

    pub fn absolute(code: u16, value: i32) -> Self {
        Self::now(EventType::Absolute, code, value)
    }

    pub fn key(code: u16, value: i32) -> Self {
        Self::now(EventType::Key, code, value)
    }

    /// `SYN_REPORT` frame terminator.
    pub fn sync() -> Self {
        Self::now(EventType::Sync, codes::SYN_REPORT, 0)
    }
}

/// Category of an input channel on a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    RelAxis,
    AbsAxis,
    Button,
}

/// Describes a channel exposed by a device.
///
/// Built from the capability tables so UIs and binding systems can present
/// stable channel names and ranges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDesc {
    pub kind: ChannelKind,
    /// Logical index (matches the position in `get_polled_data` arrays).
    pub idx: u16,
    /// Raw kernel code the channel maps from.
    pub code: u16,
    /// Symbolic kernel name (e.g. `"ABS_X"`, `"BTN_SOUTH"`) when known.
    pub name: Option<String>,
    /// Axis range for absolute axes; `0..=1` for buttons; `0..=0` for relative axes.
    pub logical_min: i32,
    pub logical_max: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_raw_values() {
        for ty in [0u16, 1, 2, 3, 4, 0x11, 0x15] {
            assert_eq!(EventType::from_raw(ty).raw(), ty);
        }
        assert_eq!(EventType::from_raw(codes::EV_MSC), EventType::Other(4));
    }

    #[test]
    fn constructors_tag_the_type() {
        assert_eq!(RawEvent::relative(0, 3).kind, EventType::Relative);
        assert_eq!(RawEvent::absolute(0, 3).kind, EventType::Absolute);
        assert_eq!(RawEvent::key(0x130, 1).kind, EventType::Key);
        assert_eq!(RawEvent::sync().code, codes::SYN_REPORT);
    }
}
