use wormloop::cli::CliOverrides;
use wormloop::run_with_overrides;

fn main() {
    let options = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed.into_run_options(),
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run_with_overrides(options) {
        eprintln!("Application error: {err:?}");
    }
}
