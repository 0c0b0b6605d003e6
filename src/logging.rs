use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger for the `hapticsim` binary.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` selects debug level and
/// the default is info. Per-iteration loop records and the overlay are
/// logged at trace level, so they need `RUST_LOG=trace`. Timestamps carry
/// milliseconds.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set.
    let _ = builder.try_init();
}
