//! Polling configuration.
//!
//! [`PollConfig`] is plain serde data; hosts can embed it in their own TOML
//! or load it standalone:
//!
//! ```toml
//! max_events_per_poll = 128
//! initial_state = "zero"
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on events drained by a single `poll()`.
pub const DEFAULT_MAX_EVENTS_PER_POLL: usize = 256;

/// Where absolute positions and button states start before the first event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// Seed from the kernel (`absinfo.value`, key-state bitmap).
    #[default]
    DeviceReported,
    /// Start every absolute axis at 0 and every button released.
    Zero,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Upper bound on events folded by one `poll()`; 0 selects the default.
    /// Leftovers are picked up on the next cycle.
    pub max_events_per_poll: usize,
    pub initial_state: InitialState,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_events_per_poll: DEFAULT_MAX_EVENTS_PER_POLL,
            initial_state: InitialState::default(),
        }
    }
}

impl PollConfig {
    /// Parse from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The drain cap `poll()` applies. A cap of 0 means the default.
    pub fn events_cap(&self) -> usize {
        match self.max_events_per_poll {
            0 => DEFAULT_MAX_EVENTS_PER_POLL,
            n => n,
        }
    }

    /// Load from a file, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no poll config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
