//! The device handle.
//!
//! [`JoystickDevice`] owns one open input device, its identity and its capability
//! tables, and advances a [`Snapshot`] on every [`poll`](JoystickDevice::poll).
//!
//! # Lifecycle
//! ```text
//! open ──ok──► Valid ──poll sees disconnect / close()──► Invalid
//!   └──fail──────────────────────────────────────────────► Invalid
//! ```
//! `Invalid` is terminal. An invalid handle answers every query with a neutral
//! value (zero counts, empty name, `BusType::Unknown`) and `poll()` returns
//! [`PollStatus::Invalid`], so callers that skip
//! [`is_valid_device`](JoystickDevice::is_valid_device) degrade instead of crashing.
//!
//! The connection is dropped exactly once, on whichever of these happens first:
//! failed construction, device loss, [`close`](JoystickDevice::close), or drop.
//!
//! # Threading
//! A handle is `Send` but not shared: `poll()` takes `&mut self`. Put it behind a
//! lock or give it to one polling thread if several threads need its data.

use crate::backends;
use crate::capability::{AxisCapability, CapabilityTables};
use crate::config::PollConfig;
use crate::device::EventSource;
use crate::error::{Error, Result};
use crate::event::{ChannelDesc, RawEvent};
use crate::metadata::{BusType, DeviceIdentity, DeviceKind};
use crate::snapshot::Snapshot;
use crate::translate;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Outcome of one [`JoystickDevice::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    /// At least one event was drained and folded.
    Success,
    /// Nothing was pending. Not an error.
    NoData,
    /// The connection was severed during this poll; the handle is now invalid.
    DeviceGone,
    /// The handle was already invalid; nothing was read.
    Invalid,
}

impl PollStatus {
    #[inline]
    pub fn is_success(self) -> bool {
        self == PollStatus::Success
    }

    /// `true` for `Success` and `NoData`.
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, PollStatus::Success | PollStatus::NoData)
    }
}

/// Serializable summary of a valid handle, for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct DeviceReport {
    pub source: String,
    pub identity: DeviceIdentity,
    pub kind: DeviceKind,
    pub channels: Vec<ChannelDesc>,
}

impl DeviceReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything that only exists while the device is usable.
struct Live {
    source: Box<dyn EventSource>,
    identity: DeviceIdentity,
    kind: DeviceKind,
    caps: CapabilityTables,
    snap: Snapshot,
    /// Reused drain buffer.
    buf: Vec<RawEvent>,
}

impl Live {
    /// Query the source once and build the tables. On error the source is
    /// dropped here, which closes the connection.
    fn build(mut source: Box<dyn EventSource>, config: &PollConfig) -> Result<Self> {
        let probe = source.probe().map_err(Error::Probe)?;
        let caps = CapabilityTables::from_probe(&probe);
        if caps.is_empty() {
            return Err(Error::NotInputDevice);
        }
        let kind = caps.guess_kind(&probe.identity.name);
        let snap = Snapshot::seeded(&caps, &probe, config.initial_state);

        Ok(Self {
            source,
            identity: probe.identity,
            kind,
            caps,
            snap,
            buf: Vec::new(),
        })
    }

    /// Reset relative deltas, drain up to `max` events and fold them.
    fn drain(&mut self, max: usize) -> io::Result<usize> {
        self.snap.reset_rel();
        self.buf.clear();

        while self.buf.len() < max {
            match self.source.read_events(&mut self.buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    break
                }
                Err(e) => return Err(e),
            }
        }

        if self.buf.is_empty() {
            return Ok(0);
        }
        let stats = translate::fold(&self.caps, &mut self.snap, &self.buf);
        trace!(
            device = self.source.label(),
            drained = self.buf.len(),
            applied = stats.applied,
            ignored = stats.ignored,
            "poll"
        );
        Ok(self.buf.len())
    }

    fn abs_axis(&self, index: usize) -> Result<&AxisCapability> {
        let axes = self.caps.abs_axes();
        axes.get(index).ok_or(Error::AxisOutOfRange {
            index,
            count: axes.len(),
        })
    }
}

enum State {
    Valid(Box<Live>),
    Invalid,
}

/// Handle to one joystick / gamepad device node.
pub struct JoystickDevice {
    state: State,
    config: PollConfig,
    label: String,
    open_error: Option<Error>,
}

impl JoystickDevice {
    /// Open `path` with the default [`PollConfig`].
    ///
    /// Never fails: if the node cannot be opened or is not an input device the
    /// handle is returned invalid. Check [`is_valid_device`](Self::is_valid_device).
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with_config(path, PollConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: PollConfig) -> Self {
        let path = path.as_ref();
        match backends::open_source(path) {
            Ok(source) => Self::from_boxed(source, config),
            Err(err) => Self::invalid(path.display().to_string(), config, err),
        }
    }

    /// Build a handle over any [`EventSource`].
    pub fn from_source(source: impl EventSource + 'static, config: PollConfig) -> Self {
        Self::from_boxed(Box::new(source), config)
    }

    fn from_boxed(source: Box<dyn EventSource>, config: PollConfig) -> Self {
        let label = source.label().to_owned();
        match Live::build(source, &config) {
            Ok(live) => {
                info!(
                    device = %label,
                    name = %live.identity.name,
                    bus = %live.identity.bus,
                    vendor = format_args!("{:04x}", live.identity.vendor_id),
                    product = format_args!("{:04x}", live.identity.product_id),
                    kind = ?live.kind,
                    "opened input device"
                );
                debug!(
                    device = %label,
                    rel_axes = live.caps.rel_axes().len(),
                    abs_axes = live.caps.abs_axes().len(),
                    buttons = live.caps.buttons().len(),
                    "capabilities"
                );
                Self {
                    state: State::Valid(Box::new(live)),
                    config,
                    label,
                    open_error: None,
                }
            }
            Err(err) => Self::invalid(label, config, err),
        }
    }

    fn invalid(label: String, config: PollConfig, err: Error) -> Self {
        warn!(device = %label, error = %err, "input device unavailable");
        Self {
            state: State::Invalid,
            config,
            label,
            open_error: Some(err),
        }
    }

    #[inline]
    fn live(&self) -> Option<&Live> {
        match &self.state {
            State::Valid(live) => Some(live.as_ref()),
            State::Invalid => None,
        }
    }

    /// Whether the handle is usable. Check before trusting other results.
    pub fn is_valid_device(&self) -> bool {
        matches!(self.state, State::Valid(_))
    }

    /// Why construction failed, if it did.
    pub fn open_error(&self) -> Option<&Error> {
        self.open_error.as_ref()
    }

    /// Device-node path (or backend label) this handle was built from.
    pub fn path(&self) -> &str {
        &self.label
    }

    // --- cardinalities ---

    pub fn number_rel_axes(&self) -> usize {
        self.live().map_or(0, |l| l.caps.rel_axes().len())
    }

    pub fn number_abs_axes(&self) -> usize {
        self.live().map_or(0, |l| l.caps.abs_axes().len())
    }

    pub fn number_buttons(&self) -> usize {
        self.live().map_or(0, |l| l.caps.buttons().len())
    }

    // --- identity ---

    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.live().map(|l| &l.identity)
    }

    pub fn name(&self) -> &str {
        self.live().map_or("", |l| l.identity.name.as_str())
    }

    pub fn bus_type(&self) -> BusType {
        self.live().map_or(BusType::Unknown, |l| l.identity.bus)
    }

    pub fn vendor_id(&self) -> u16 {
        self.live().map_or(0, |l| l.identity.vendor_id)
    }

    pub fn product_id(&self) -> u16 {
        self.live().map_or(0, |l| l.identity.product_id)
    }

    pub fn version(&self) -> u16 {
        self.live().map_or(0, |l| l.identity.version)
    }

    pub fn kind(&self) -> DeviceKind {
        self.live().map_or(DeviceKind::Unknown, |l| l.kind)
    }

    pub fn capabilities(&self) -> Option<&CapabilityTables> {
        self.live().map(|l| &l.caps)
    }

    // --- supported codes ---

    /// Write the raw `REL_*` code of each relative axis, in logical order.
    pub fn get_supported_rel_axes(&self, out: &mut [u16]) -> Result<usize> {
        let caps = self.live().map_or(&[][..], |l| l.caps.rel_axes());
        fill_codes("rel axis", caps.iter().map(|c| c.code), caps.len(), out)
    }

    /// Write the raw `ABS_*` code of each absolute axis, in logical order.
    pub fn get_supported_abs_axes(&self, out: &mut [u16]) -> Result<usize> {
        let caps = self.live().map_or(&[][..], |l| l.caps.abs_axes());
        fill_codes("abs axis", caps.iter().map(|c| c.code), caps.len(), out)
    }

    /// Write the raw `KEY_*`/`BTN_*` code of each button, in logical order.
    pub fn get_supported_buttons(&self, out: &mut [u16]) -> Result<usize> {
        let caps = self.live().map_or(&[][..], |l| l.caps.buttons());
        fill_codes("button", caps.iter().map(|c| c.code), caps.len(), out)
    }

    // --- calibration ---

    fn abs_axis(&self, index: usize) -> Result<&AxisCapability> {
        match self.live() {
            Some(live) => live.abs_axis(index),
            None => Err(Error::AxisOutOfRange { index, count: 0 }),
        }
    }

    pub fn abs_axis_minimum(&self, index: usize) -> Result<i32> {
        self.abs_axis(index).map(|a| a.minimum)
    }

    pub fn abs_axis_maximum(&self, index: usize) -> Result<i32> {
        self.abs_axis(index).map(|a| a.maximum)
    }

    pub fn abs_axis_fuzz(&self, index: usize) -> Result<i32> {
        self.abs_axis(index).map(|a| a.fuzz)
    }

    // --- polling ---

    /// Drain whatever the device has ready and fold it into the snapshot.
    ///
    /// Relative deltas restart from zero on every call. Never blocks waiting
    /// for input.
    pub fn poll(&mut self) -> PollStatus {
        let max = self.config.events_cap();
        let State::Valid(live) = &mut self.state else {
            return PollStatus::Invalid;
        };

        match live.drain(max) {
            Ok(0) => PollStatus::NoData,
            Ok(_) => PollStatus::Success,
            Err(err) => {
                warn!(device = %self.label, error = %err, "input device lost");
                self.state = State::Invalid;
                PollStatus::DeviceGone
            }
        }
    }

    /// Copy the current snapshot into caller-sized slices.
    ///
    /// Each slice must be at least as long as the matching `number_*` count;
    /// extra elements are left untouched.
    pub fn get_polled_data(
        &self,
        rel: &mut [i32],
        abs: &mut [i32],
        buttons: &mut [bool],
    ) -> Result<()> {
        let Some(live) = self.live() else {
            return Ok(());
        };
        let snap = &live.snap;
        Error::check_len("rel axis", snap.rel.len(), rel.len())?;
        Error::check_len("abs axis", snap.abs.len(), abs.len())?;
        Error::check_len("button", snap.buttons.len(), buttons.len())?;

        rel[..snap.rel.len()].copy_from_slice(&snap.rel);
        abs[..snap.abs.len()].copy_from_slice(&snap.abs);
        buttons[..snap.buttons.len()].copy_from_slice(&snap.buttons);
        Ok(())
    }

    /// Owned copy of the current snapshot (empty when invalid).
    pub fn snapshot(&self) -> Snapshot {
        self.live().map(|l| l.snap.clone()).unwrap_or_default()
    }

    // --- descriptions ---

    pub fn describe(&self) -> Vec<ChannelDesc> {
        self.live().map(|l| l.caps.describe()).unwrap_or_default()
    }

    pub fn report(&self) -> Option<DeviceReport> {
        self.live().map(|l| DeviceReport {
            source: self.label.clone(),
            identity: l.identity.clone(),
            kind: l.kind,
            channels: l.caps.describe(),
        })
    }

    /// Release the device now. The handle becomes invalid. Idempotent.
    pub fn close(&mut self) {
        if let State::Valid(_) = std::mem::replace(&mut self.state, State::Invalid) {
            debug!(device = %self.label, "closed input device");
        }
    }
}

fn fill_codes(
    what: &'static str,
    codes: impl Iterator<Item = u16>,
    count: usize,
    out: &mut [u16],
) -> Result<usize> {
    Error::check_len(what, count, out.len())?;
    for (slot, code) in out.iter_mut().zip(codes) {
        *slot = code;
    }
    Ok(count)
}

impl fmt::Debug for JoystickDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoystickDevice")
            .field("path", &self.label)
            .field("valid", &self.is_valid_device())
            .field("identity", &self.identity())
            .field("rel_axes", &self.number_rel_axes())
            .field("abs_axes", &self.number_abs_axes())
            .field("buttons", &self.number_buttons())
            .finish()
    }
}
