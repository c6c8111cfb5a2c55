mod platform;

fn main() {
    if let Err(err) = platform::run_app() {
        eprintln!("sidebar error: {err:#}");
        std::process::exit(1);
    }
}
