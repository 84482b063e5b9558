//! Internal developer diagnostics, separate from the Renderer's user-facing
//! `--verbose` summaries (see SPEC_FULL.md §6.2).
use tracing_subscriber::EnvFilter;

/// `verbosity` is the `-v` occurrence count from the CLI: 0 = warn, 1 = info,
/// 2 = debug, 3+ = trace. `RUST_LOG` always wins when set.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
