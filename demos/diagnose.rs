use stickpoll::JoystickDevice;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: diagnose /dev/input/eventN [...]");
        std::process::exit(2);
    }

    for path in paths {
        let dev = JoystickDevice::open(&path);
        match dev.report() {
            Some(report) => println!("{}", report.to_json().expect("serialize report")),
            None => eprintln!("{path}: {:?}", dev.open_error()),
        }
    }
}
