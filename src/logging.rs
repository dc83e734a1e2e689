use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr; stdout carries the tracking result.
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` picks the level for the library and binary
/// (0 = warn, 1 = info, 2+ = debug).
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init: tests may install a subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// Filter directive covering both the library target and the `parcel` binary target.
fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("parcel_tracker={0},parcel={0},warn", level)
}
