//! stickpoll: capability discovery and snapshot polling for evdev joysticks.
//!
//! Opens one `/dev/input/event*` node, discovers its relative axes, absolute axes
//! (with min/max/fuzz) and buttons, and turns the kernel's event stream into dense,
//! logically indexed snapshots on each poll.
//!
//! ```no_run
//! use stickpoll::{JoystickDevice, PollStatus};
//!
//! let mut dev = JoystickDevice::open("/dev/input/event7");
//! if !dev.is_valid_device() {
//!     eprintln!("no device: {:?}", dev.open_error());
//!     return;
//! }
//! let mut rel = vec![0; dev.number_rel_axes()];
//! let mut abs = vec![0; dev.number_abs_axes()];
//! let mut buttons = vec![false; dev.number_buttons()];
//! loop {
//!     match dev.poll() {
//!         PollStatus::Success => {
//!             dev.get_polled_data(&mut rel, &mut abs, &mut buttons).unwrap();
//!             println!("{abs:?} {buttons:?}");
//!         }
//!         PollStatus::NoData => std::thread::sleep(std::time::Duration::from_millis(5)),
//!         PollStatus::DeviceGone | PollStatus::Invalid => break,
//!     }
//! }
//! ```
//!
//! Device-node discovery and hotplug are left to the host; pass in a path.

pub mod backends;
pub mod capability;
pub mod codes;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod handle;
pub mod metadata;
pub mod snapshot;
pub mod translate;

pub use capability::{AxisCapability, ButtonCapability, CapabilityTables, RelAxisCapability};
pub use config::{InitialState, PollConfig};
pub use device::{AbsInfo, DeviceProbe, EventSource};
pub use error::{Error, Result};
pub use event::{ChannelDesc, ChannelKind, EventType, RawEvent};
pub use handle::{DeviceReport, JoystickDevice, PollStatus};
pub use metadata::{BusType, DeviceIdentity, DeviceKind};
pub use snapshot::Snapshot;
