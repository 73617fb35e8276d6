use std::time::{Duration, Instant};

use stickpoll::{JoystickDevice, PollConfig, PollStatus};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/input/event0".to_string());
    let config = PollConfig::load("stickpoll.toml").expect("read stickpoll.toml");

    let mut dev = JoystickDevice::open_with_config(&path, config);
    if !dev.is_valid_device() {
        eprintln!("{path}: {:?}", dev.open_error());
        std::process::exit(1);
    }

    println!("== {} ({}) kind={:?} ==", dev.name(), dev.path(), dev.kind());
    for ch in dev.describe() {
        println!(
            "  {:?} #{:02} code=0x{:03x} name={:?} logical=[{}..{}]",
            ch.kind, ch.idx, ch.code, ch.name, ch.logical_min, ch.logical_max
        );
    }

    let mut rel = vec![0; dev.number_rel_axes()];
    let mut abs = vec![0; dev.number_abs_axes()];
    let mut buttons = vec![false; dev.number_buttons()];

    // Print at most every 40ms so a twitchy stick doesn't flood the terminal
    let flush_every = Duration::from_millis(40);
    let mut last_flush = Instant::now();
    let mut dirty = false;

    loop {
        match dev.poll() {
            PollStatus::Success => dirty = true,
            PollStatus::NoData => {}
            PollStatus::DeviceGone | PollStatus::Invalid => {
                println!("device gone");
                break;
            }
        }

        if dirty && last_flush.elapsed() >= flush_every {
            dev.get_polled_data(&mut rel, &mut abs, &mut buttons)
                .expect("buffers sized from counts");
            let held: Vec<usize> = buttons
                .iter()
                .enumerate()
                .filter_map(|(i, &b)| b.then_some(i))
                .collect();
            println!("rel={rel:?} abs={abs:?} held={held:?}");
            dirty = false;
            last_flush = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(5));
    }
}
