//! Capability tables.
//!
//! Built once from a [`DeviceProbe`](crate::device::DeviceProbe) and read-only
//! afterward. Each category (relative axes, absolute axes, buttons) gets a
//! dense logical numbering in ascending raw-code order, plus a [`CodeMap`] so
//! the translator resolves `raw code -> logical index` with one slice lookup.

use crate::codes;
use crate::device::{AbsInfo, DeviceProbe};
use crate::event::{ChannelDesc, ChannelKind};
use crate::metadata::DeviceKind;
use serde::{Deserialize, Serialize};

/// A supported relative axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelAxisCapability {
    pub index: u16,
    pub code: u16,
}

/// A supported absolute axis with its calibration data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCapability {
    pub index: u16,
    pub code: u16,
    pub minimum: i32,
    pub maximum: i32,
    /// Noise threshold; the kernel drops changes smaller than this.
    pub fuzz: i32,
    /// Dead zone around the center, as reported by the kernel.
    pub flat: i32,
    /// Units per millimeter (or per radian for rotational axes); 0 if unknown.
    pub resolution: i32,
}

impl AxisCapability {
    /// Map a raw position onto `[-1.0, 1.0]` over `[minimum, maximum]`.
    ///
    /// Degenerate ranges (`minimum == maximum`) map to `0.0`.
    pub fn normalize(&self, value: i32) -> f32 {
        let min = self.minimum as f64;
        let max = self.maximum as f64;
        if max <= min {
            return 0.0;
        }
        let v = (value as f64).clamp(min, max);
        ((v - min) / (max - min) * 2.0 - 1.0) as f32
    }
}

/// A supported button or key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonCapability {
    pub index: u16,
    pub code: u16,
}

/// Dense `raw code -> logical index` table for one code space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeMap(Box<[Option<u16>]>);

impl CodeMap {
    /// Build a map over `0..space` where `codes[i]` gets logical index `i`.
    ///
    /// Codes at or beyond `space` are not addressable and are skipped.
    fn build(space: usize, codes: impl IntoIterator<Item = u16>) -> Self {
        let mut table = vec![None; space].into_boxed_slice();
        for (index, code) in codes.into_iter().enumerate() {
            if let Some(slot) = table.get_mut(code as usize) {
                *slot = Some(index as u16);
            }
        }
        CodeMap(table)
    }

    #[inline]
    pub fn get(&self, code: u16) -> Option<usize> {
        self.0.get(code as usize).copied().flatten().map(usize::from)
    }
}

/// Per-handle capability set.
#[derive(Clone, Debug)]
pub struct CapabilityTables {
    rel: Vec<RelAxisCapability>,
    abs: Vec<AxisCapability>,
    buttons: Vec<ButtonCapability>,
    rel_map: CodeMap,
    abs_map: CodeMap,
    button_map: CodeMap,
}

impl CapabilityTables {
    /// Assign logical indices and precompute the lookup tables.
    ///
    /// Codes are sorted and deduplicated first so the numbering only depends on
    /// the capability set, not on the order the backend reported it in.
    pub fn from_probe(probe: &DeviceProbe) -> Self {
        let rel_codes = sorted_in_space(probe.rel_codes.iter().copied(), codes::REL_CNT);
        let button_codes = sorted_in_space(probe.key_codes.iter().copied(), codes::KEY_CNT);

        let mut abs_infos: Vec<AbsInfo> = probe
            .abs
            .iter()
            .copied()
            .filter(|info| (info.code as usize) < codes::ABS_CNT)
            .collect();
        abs_infos.sort_by_key(|info| info.code);
        abs_infos.dedup_by_key(|info| info.code);

        let rel = rel_codes
            .iter()
            .enumerate()
            .map(|(i, &code)| RelAxisCapability {
                index: i as u16,
                code,
            })
            .collect();
        let abs = abs_infos
            .iter()
            .enumerate()
            .map(|(i, info)| AxisCapability {
                index: i as u16,
                code: info.code,
                minimum: info.minimum,
                maximum: info.maximum,
                fuzz: info.fuzz,
                flat: info.flat,
                resolution: info.resolution,
            })
            .collect();
        let buttons = button_codes
            .iter()
            .enumerate()
            .map(|(i, &code)| ButtonCapability {
                index: i as u16,
                code,
            })
            .collect();

        Self {
            rel_map: CodeMap::build(codes::REL_CNT, rel_codes.iter().copied()),
            abs_map: CodeMap::build(codes::ABS_CNT, abs_infos.iter().map(|i| i.code)),
            button_map: CodeMap::build(codes::KEY_CNT, button_codes.iter().copied()),
            rel,
            abs,
            buttons,
        }
    }

    pub fn rel_axes(&self) -> &[RelAxisCapability] {
        &self.rel
    }

    pub fn abs_axes(&self) -> &[AxisCapability] {
        &self.abs
    }

    pub fn buttons(&self) -> &[ButtonCapability] {
        &self.buttons
    }

    pub fn is_empty(&self) -> bool {
        self.rel.is_empty() && self.abs.is_empty() && self.buttons.is_empty()
    }

    #[inline]
    pub fn rel_index(&self, code: u16) -> Option<usize> {
        self.rel_map.get(code)
    }

    #[inline]
    pub fn abs_index(&self, code: u16) -> Option<usize> {
        self.abs_map.get(code)
    }

    #[inline]
    pub fn button_index(&self, code: u16) -> Option<usize> {
        self.button_map.get(code)
    }

    /// Channel list in logical order: relative axes, absolute axes, buttons.
    pub fn describe(&self) -> Vec<ChannelDesc> {
        let rel = self.rel.iter().map(|c| ChannelDesc {
            kind: ChannelKind::RelAxis,
            idx: c.index,
            code: c.code,
            name: codes::rel_name(c.code).map(str::to_owned),
            logical_min: 0,
            logical_max: 0,
        });
        let abs = self.abs.iter().map(|c| ChannelDesc {
            kind: ChannelKind::AbsAxis,
            idx: c.index,
            code: c.code,
            name: codes::abs_name(c.code).map(str::to_owned),
            logical_min: c.minimum,
            logical_max: c.maximum,
        });
        let buttons = self.buttons.iter().map(|c| ChannelDesc {
            kind: ChannelKind::Button,
            idx: c.index,
            code: c.code,
            name: codes::button_name(c.code).map(str::to_owned),
            logical_min: 0,
            logical_max: 1,
        });
        rel.chain(abs).chain(buttons).collect()
    }

    /// Guess what sort of device this is from its name and capabilities.
    ///
    /// Each category collects "traits": a matching word in the name, owning the
    /// largest button family, and axis counts. The highest score wins; ties go
    /// to the earlier entry of mouse, keyboard, stick, gamepad.
    ///
    /// The button-family trait is only awarded when the device has at least one
    /// button. Without that guard an axes-only device would collect a mouse
    /// trait from four empty families tying at zero and be reported as a mouse;
    /// here it scores as a stick.
    pub fn guess_kind(&self, name: &str) -> DeviceKind {
        if self.is_empty() {
            return DeviceKind::Unknown;
        }

        let name = name.to_lowercase();
        let mut mouse = name.contains("mouse") as u32;
        let mut keyboard = name.contains("keyboard") as u32;
        let mut stick = name.contains("joystick") as u32;
        let mut gamepad = name.contains("gamepad") as u32;

        let (mut mouse_btns, mut key_btns, mut stick_btns, mut pad_btns) = (0u32, 0u32, 0u32, 0u32);
        for button in &self.buttons {
            match button.code {
                c if c < codes::BTN_MISC => key_btns += 1,
                c if (codes::BTN_MOUSE..codes::BTN_JOYSTICK).contains(&c) => mouse_btns += 1,
                c if (codes::BTN_JOYSTICK..codes::BTN_GAMEPAD).contains(&c) => stick_btns += 1,
                c if (codes::BTN_GAMEPAD..codes::BTN_DIGI).contains(&c) => pad_btns += 1,
                _ => {}
            }
        }
        let top = mouse_btns.max(key_btns).max(stick_btns).max(pad_btns);
        if top > 0 {
            if mouse_btns == top {
                mouse += 1;
            } else if key_btns == top {
                keyboard += 1;
            } else if stick_btns == top {
                stick += 1;
            } else {
                gamepad += 1;
            }
        }

        if self.rel.len() >= 2 {
            mouse += 1;
        }
        if self.abs.len() >= 2 {
            stick += 1;
            gamepad += 1;
        }

        let best = mouse.max(keyboard).max(stick).max(gamepad);
        if mouse == best {
            DeviceKind::Mouse
        } else if keyboard == best {
            DeviceKind::Keyboard
        } else if stick == best {
            DeviceKind::Stick
        } else {
            DeviceKind::Gamepad
        }
    }
}

fn sorted_in_space(codes: impl Iterator<Item = u16>, space: usize) -> Vec<u16> {
    let mut out: Vec<u16> = codes.filter(|&c| (c as usize) < space).collect();
    out.sort_unstable();
    out.dedup();
    out
}
