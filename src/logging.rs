//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `debug` or
/// `timeclock::api=trace`.
pub const LOG_ENV: &str = "TIMECLOCK_LOG";

/// Filter for a `-v` count. `TIMECLOCK_LOG` wins when set and valid.
pub fn filter_for(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber. Output goes to stderr so command output
/// on stdout stays clean. Calling it twice is harmless.
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
