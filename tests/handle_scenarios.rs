use stickpoll::backends::virtual_input::VirtualSource;
use stickpoll::codes::*;
use stickpoll::{
    BusType, DeviceKind, Error, InitialState, JoystickDevice, PollConfig, PollStatus, RawEvent,
};

fn two_axis_three_button() -> VirtualSource {
    VirtualSource::new("Scenario Stick")
        .bus(BusType::Usb)
        .ids(0x046d, 0xc215, 0x0110)
        .abs_axis_with(ABS_X, 0, 255, 0, 0, 127)
        .abs_axis_with(ABS_Y, -32767, 32767, 16, 0, -40)
        .button(BTN_TRIGGER)
        .button(BTN_THUMB)
        .button(BTN_START)
}

fn open(source: &VirtualSource) -> JoystickDevice {
    JoystickDevice::from_source(source.clone(), PollConfig::default())
}

fn polled(dev: &JoystickDevice) -> (Vec<i32>, Vec<i32>, Vec<bool>) {
    let mut rel = vec![0; dev.number_rel_axes()];
    let mut abs = vec![0; dev.number_abs_axes()];
    let mut buttons = vec![false; dev.number_buttons()];
    dev.get_polled_data(&mut rel, &mut abs, &mut buttons).unwrap();
    (rel, abs, buttons)
}

#[test]
fn counts_match_supported_code_arrays() {
    let dev = open(&VirtualSource::gamepad("Pad").rel_axis(REL_WHEEL));
    assert!(dev.is_valid_device());

    let mut abs = vec![0u16; dev.number_abs_axes()];
    assert_eq!(dev.get_supported_abs_axes(&mut abs).unwrap(), 6);
    assert_eq!(abs, vec![ABS_X, ABS_Y, ABS_RX, ABS_RY, ABS_HAT0X, ABS_HAT0Y]);

    let mut rel = vec![0u16; dev.number_rel_axes()];
    assert_eq!(dev.get_supported_rel_axes(&mut rel).unwrap(), 1);
    assert_eq!(rel, vec![REL_WHEEL]);

    let mut buttons = vec![0u16; dev.number_buttons()];
    assert_eq!(dev.get_supported_buttons(&mut buttons).unwrap(), 5);
    assert_eq!(buttons, vec![BTN_SOUTH, BTN_EAST, BTN_NORTH, BTN_WEST, BTN_START]);

    for i in 0..dev.number_abs_axes() {
        let min = dev.abs_axis_minimum(i).unwrap();
        let max = dev.abs_axis_maximum(i).unwrap();
        assert!(min < max);
        assert!(dev.abs_axis_fuzz(i).unwrap() >= 0);
    }
}

#[test]
fn undersized_output_is_rejected() {
    let dev = open(&two_axis_three_button());
    let mut codes = [0u16; 1];
    assert!(matches!(
        dev.get_supported_buttons(&mut codes),
        Err(Error::BufferTooSmall {
            needed: 3,
            got: 1,
            ..
        })
    ));

    let mut rel: [i32; 0] = [];
    let mut abs = [0; 2];
    let mut buttons = [false; 2];
    assert!(matches!(
        dev.get_polled_data(&mut rel, &mut abs, &mut buttons),
        Err(Error::BufferTooSmall { what: "button", .. })
    ));
}

#[test]
fn oversized_output_keeps_the_tail() {
    let dev = open(&two_axis_three_button());
    let mut abs = [i32::MIN; 4];
    let mut rel: [i32; 0] = [];
    let mut buttons = [true; 5];
    dev.get_polled_data(&mut rel, &mut abs, &mut buttons).unwrap();
    assert_eq!(abs, [127, -40, i32::MIN, i32::MIN]);
    assert_eq!(buttons, [false, false, false, true, true]);
}

#[test]
fn identity_is_stable() {
    let dev = open(&two_axis_three_button());
    for _ in 0..2 {
        assert_eq!(dev.name(), "Scenario Stick");
        assert_eq!(dev.bus_type(), BusType::Usb);
        assert_eq!(dev.vendor_id(), 0x046d);
        assert_eq!(dev.product_id(), 0xc215);
        assert_eq!(dev.version(), 0x0110);
    }
    assert_eq!(dev.kind(), DeviceKind::Stick);
}

#[test]
fn initial_snapshot_before_any_event() {
    let src = VirtualSource::new("Init")
        .rel_axis(REL_X)
        .abs_axis_with(ABS_X, 0, 255, 0, 0, 200)
        .button(BTN_SOUTH)
        .button(BTN_EAST)
        .held(BTN_EAST);

    let dev = open(&src);
    let (rel, abs, buttons) = polled(&dev);
    assert_eq!(rel, vec![0]);
    assert_eq!(abs, vec![200]);
    assert_eq!(buttons, vec![false, true]);

    let zeroed = JoystickDevice::from_source(
        src.clone(),
        PollConfig {
            initial_state: InitialState::Zero,
            ..Default::default()
        },
    );
    let (_, abs, buttons) = polled(&zeroed);
    assert_eq!(abs, vec![0]);
    assert_eq!(buttons, vec![false, false]);
}

#[test]
fn relative_deltas_reset_every_poll() {
    let src = VirtualSource::new("Wheel").rel_axis(REL_X).rel_axis(REL_WHEEL);
    let mut dev = open(&src);

    src.move_axis(REL_X, 5);
    src.move_axis(REL_X, 2);
    src.move_axis(REL_WHEEL, -1);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(polled(&dev).0, vec![7, -1]);

    assert_eq!(dev.poll(), PollStatus::NoData);
    assert_eq!(polled(&dev).0, vec![0, 0]);
}

#[test]
fn absolute_positions_persist_across_quiet_polls() {
    let src = two_axis_three_button();
    let mut dev = open(&src);

    src.set_axis(ABS_Y, 1000);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(polled(&dev).1, vec![127, 1000]);

    src.press_button(BTN_THUMB);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(polled(&dev).1, vec![127, 1000]);

    assert_eq!(dev.poll(), PollStatus::NoData);
    assert_eq!(polled(&dev).1, vec![127, 1000]);
    assert_eq!(polled(&dev).2, vec![false, true, false]);
}

#[test]
fn axis_and_button_scenario() {
    let src = two_axis_three_button();
    let mut dev = open(&src);

    assert_eq!(dev.number_abs_axes(), 2);
    assert_eq!(dev.number_buttons(), 3);
    assert_eq!(dev.abs_axis_minimum(0).unwrap(), 0);
    assert_eq!(dev.abs_axis_maximum(0).unwrap(), 255);
    assert_eq!(dev.abs_axis_fuzz(0).unwrap(), 0);
    assert_eq!(dev.abs_axis_minimum(1).unwrap(), -32767);
    assert_eq!(dev.abs_axis_maximum(1).unwrap(), 32767);
    assert_eq!(dev.abs_axis_fuzz(1).unwrap(), 16);

    src.feed(RawEvent::absolute(ABS_X, 128));
    src.feed(RawEvent::key(BTN_THUMB, 1));
    src.feed(RawEvent::sync());
    assert_eq!(dev.poll(), PollStatus::Success);

    let (_, abs, buttons) = polled(&dev);
    assert_eq!(abs, vec![128, -40]);
    assert_eq!(buttons, vec![false, true, false]);
}

#[test]
fn events_for_unsupported_codes_are_ignored() {
    let src = two_axis_three_button();
    let mut dev = open(&src);
    let before = dev.snapshot();

    src.feed(RawEvent::absolute(ABS_RZ, 9));
    src.feed(RawEvent::key(BTN_SOUTH, 1));
    src.feed(RawEvent::relative(REL_WHEEL, 3));
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(dev.snapshot(), before);
}

#[test]
fn autorepeat_counts_as_pressed() {
    let src = two_axis_three_button();
    let mut dev = open(&src);
    src.feed(RawEvent::key(BTN_START, 1));
    src.feed(RawEvent::key(BTN_START, 2));
    dev.poll();
    assert!(dev.snapshot().buttons()[2]);

    src.release_button(BTN_START);
    dev.poll();
    assert!(!dev.snapshot().any_pressed());
}

#[test]
fn large_backlog_is_drained_in_capped_polls() {
    let src = VirtualSource::new("Backlog").rel_axis(REL_X);
    let mut dev = JoystickDevice::from_source(
        src.clone(),
        PollConfig {
            max_events_per_poll: 100,
            ..Default::default()
        },
    );
    for _ in 0..300 {
        src.feed(RawEvent::relative(REL_X, 1));
    }

    // Batches of 64: two polls take 128 each, the last takes the remaining 44.
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(dev.snapshot().rel(), &[128]);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(dev.snapshot().rel(), &[128]);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(dev.snapshot().rel(), &[44]);
    assert_eq!(dev.poll(), PollStatus::NoData);
}

#[test]
fn zero_cap_drains_like_the_default() {
    let src = VirtualSource::new("Zero Cap").rel_axis(REL_X);
    let mut dev = JoystickDevice::from_source(
        src.clone(),
        PollConfig {
            max_events_per_poll: 0,
            ..Default::default()
        },
    );
    for _ in 0..200 {
        src.feed(RawEvent::relative(REL_X, 1));
    }

    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(dev.snapshot().rel(), &[200]);
    assert_eq!(dev.poll(), PollStatus::NoData);
}

#[test]
fn unreachable_path_gives_invalid_handle() {
    let mut dev = JoystickDevice::open("/nonexistent/dev/input/event99");
    assert!(!dev.is_valid_device());
    assert!(dev.open_error().is_some());
    assert_eq!(dev.number_abs_axes(), 0);
    assert_eq!(dev.number_rel_axes(), 0);
    assert_eq!(dev.number_buttons(), 0);
    assert_eq!(dev.name(), "");
    assert_eq!(dev.bus_type(), BusType::Unknown);
    assert_eq!(dev.vendor_id(), 0);
    assert!(dev.abs_axis_minimum(0).is_err());
    assert_eq!(dev.get_supported_abs_axes(&mut []).unwrap(), 0);
    assert!(dev.get_polled_data(&mut [], &mut [], &mut []).is_ok());
    assert!(dev.describe().is_empty());
    assert!(dev.report().is_none());

    let status = dev.poll();
    assert!(!status.is_success());
    assert_eq!(status, PollStatus::Invalid);
}

#[test]
fn disconnect_mid_session() {
    let src = two_axis_three_button();
    let mut dev = open(&src);

    src.set_axis(ABS_X, 250);
    src.press_button(BTN_TRIGGER);
    assert_eq!(dev.poll(), PollStatus::Success);
    assert_eq!(polled(&dev).1[0], 250);

    assert!(dev.poll().is_alive());

    src.disconnect();
    let status = dev.poll();
    assert_eq!(status, PollStatus::DeviceGone);
    assert!(!status.is_alive());
    assert!(!dev.is_valid_device());

    // Neutral values, not the stale pre-disconnect state.
    assert_eq!(dev.number_abs_axes(), 0);
    assert_eq!(dev.number_buttons(), 0);
    assert_eq!(dev.name(), "");
    assert!(dev.snapshot().abs().is_empty());
    assert!(dev.abs_axis_maximum(0).is_err());
    assert_eq!(dev.poll(), PollStatus::Invalid);
}

#[test]
fn disconnected_before_open_is_invalid() {
    let src = two_axis_three_button();
    src.disconnect();
    let dev = open(&src);
    assert!(!dev.is_valid_device());
    assert!(matches!(dev.open_error(), Some(Error::Probe(_))));
}

#[test]
fn handles_are_independent() {
    let a = VirtualSource::gamepad("A");
    let b = VirtualSource::gamepad("B");
    let mut dev_a = open(&a);
    let mut dev_b = open(&b);

    a.press_button(BTN_SOUTH);
    assert_eq!(dev_a.poll(), PollStatus::Success);
    assert_eq!(dev_b.poll(), PollStatus::NoData);
    assert!(dev_a.snapshot().buttons()[0]);
    assert!(!dev_b.snapshot().buttons()[0]);

    let worker = std::thread::spawn(move || {
        b.set_axis(ABS_RY, -5000);
        dev_b.poll();
        dev_b.snapshot().abs()[3]
    });
    assert_eq!(worker.join().unwrap(), -5000);
}
