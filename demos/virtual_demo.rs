use stickpoll::backends::virtual_input::VirtualSource;
use stickpoll::{codes, JoystickDevice, PollConfig, PollStatus};

fn main() {
    let pad = VirtualSource::gamepad("Demo Virtual Pad");
    let mut dev = JoystickDevice::from_source(pad.clone(), PollConfig::default());

    println!("{}", dev.identity().map(|i| i.to_string()).unwrap_or_default());

    // Inject some sample input
    pad.set_axis(codes::ABS_X, 24_000);
    pad.set_axis(codes::ABS_HAT0Y, -1);
    pad.press_button(codes::BTN_EAST);

    let mut abs = vec![0; dev.number_abs_axes()];
    let mut buttons = vec![false; dev.number_buttons()];
    if dev.poll() == PollStatus::Success {
        dev.get_polled_data(&mut [], &mut abs, &mut buttons)
            .expect("buffers sized from counts");
        for (ch, value) in dev.describe().iter().zip(abs.iter()) {
            println!("(Virtual) {} = {}", ch.name.as_deref().unwrap_or("?"), value);
        }
        println!("(Virtual) buttons = {buttons:?}");
    }

    pad.disconnect();
    println!("(Virtual) after unplug: {:?}", dev.poll());
}
