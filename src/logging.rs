use tracing_subscriber::{fmt, EnvFilter};

/// Initialize stderr logging
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks the level
/// (0 = warn, 1 = debug, 2+ = trace). Stdout is left for command output.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "userjs=debug",
        _ => "userjs=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
