//! Event translator.
//!
//! Stateless folding of a drained batch of [`RawEvent`]s into a [`Snapshot`].
//! The handle owns the drain loop and the relative-axis reset; this module only
//! applies events:
//!
//! - `EV_REL`: added to the axis delta (saturating).
//! - `EV_ABS`: overwrites the axis position.
//! - `EV_KEY`: nonzero is pressed (including autorepeat `2`), zero is released.
//! - everything else, and codes missing from the capability tables: ignored.

use crate::capability::CapabilityTables;
use crate::event::{EventType, RawEvent};
use crate::snapshot::Snapshot;

/// What a fold did, for trace logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub applied: usize,
    pub ignored: usize,
}

/// Apply `events` in order.
pub fn fold(caps: &CapabilityTables, snap: &mut Snapshot, events: &[RawEvent]) -> FoldStats {
    let mut stats = FoldStats::default();
    for ev in events {
        if apply(caps, snap, ev) {
            stats.applied += 1;
        } else {
            stats.ignored += 1;
        }
    }
    stats
}

fn apply(caps: &CapabilityTables, snap: &mut Snapshot, ev: &RawEvent) -> bool {
    match ev.kind {
        EventType::Relative => match caps.rel_index(ev.code) {
            Some(i) => {
                snap.rel[i] = snap.rel[i].saturating_add(ev.value);
                true
            }
            None => false,
        },
        EventType::Absolute => match caps.abs_index(ev.code) {
            Some(i) => {
                snap.abs[i] = ev.value;
                true
            }
            None => false,
        },
        EventType::Key => match caps.button_index(ev.code) {
            Some(i) => {
                snap.buttons[i] = ev.value != 0;
                true
            }
            None => false,
        },
        EventType::Sync | EventType::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;
    use crate::config::InitialState;
    use crate::device::{AbsInfo, DeviceProbe};

    fn setup() -> (CapabilityTables, Snapshot) {
        let probe = DeviceProbe {
            rel_codes: vec![REL_X, REL_Y],
            abs: vec![
                AbsInfo {
                    code: ABS_X,
                    maximum: 255,
                    ..Default::default()
                },
                AbsInfo {
                    code: ABS_HAT0X,
                    minimum: -1,
                    maximum: 1,
                    ..Default::default()
                },
            ],
            key_codes: vec![BTN_SOUTH, BTN_EAST, BTN_NORTH],
            ..Default::default()
        };
        let caps = CapabilityTables::from_probe(&probe);
        let snap = Snapshot::seeded(&caps, &probe, InitialState::Zero);
        (caps, snap)
    }

    #[test]
    fn relative_events_accumulate() {
        let (caps, mut snap) = setup();
        let stats = fold(
            &caps,
            &mut snap,
            &[
                RawEvent::relative(REL_X, 3),
                RawEvent::sync(),
                RawEvent::relative(REL_X, -1),
                RawEvent::relative(REL_Y, 7),
            ],
        );
        assert_eq!(snap.rel(), &[2, 7]);
        assert_eq!(stats, FoldStats { applied: 3, ignored: 1 });
    }

    #[test]
    fn relative_accumulation_saturates() {
        let (caps, mut snap) = setup();
        fold(
            &caps,
            &mut snap,
            &[RawEvent::relative(REL_X, i32::MAX), RawEvent::relative(REL_X, 5)],
        );
        assert_eq!(snap.rel()[0], i32::MAX);
    }

    #[test]
    fn absolute_events_overwrite_last_wins() {
        let (caps, mut snap) = setup();
        fold(
            &caps,
            &mut snap,
            &[
                RawEvent::absolute(ABS_X, 10),
                RawEvent::absolute(ABS_X, 200),
                RawEvent::absolute(ABS_HAT0X, -1),
            ],
        );
        assert_eq!(snap.abs(), &[200, -1]);
    }

    #[test]
    fn key_values_map_to_pressed_state() {
        let (caps, mut snap) = setup();
        fold(
            &caps,
            &mut snap,
            &[
                RawEvent::key(BTN_SOUTH, 1),
                RawEvent::key(BTN_EAST, 1),
                RawEvent::key(BTN_EAST, 0),
                RawEvent::key(BTN_NORTH, 2),
            ],
        );
        assert_eq!(snap.buttons(), &[true, false, true]);
    }

    #[test]
    fn unknown_codes_and_types_are_ignored() {
        let (caps, mut snap) = setup();
        let before = snap.clone();
        let stats = fold(
            &caps,
            &mut snap,
            &[
                RawEvent::absolute(ABS_RZ, 99),
                RawEvent::key(BTN_START, 1),
                RawEvent::relative(REL_WHEEL, 1),
                RawEvent::now(EventType::Other(EV_MSC), 4, 0x90001),
                RawEvent::key(0x2ff, 1),
            ],
        );
        assert_eq!(snap, before);
        assert_eq!(stats.applied, 0);
        assert_eq!(stats.ignored, 5);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (caps, mut snap) = setup();
        let before = snap.clone();
        assert_eq!(fold(&caps, &mut snap, &[]), FoldStats::default());
        assert_eq!(snap, before);
    }
}
