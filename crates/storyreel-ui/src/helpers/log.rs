// crates/storyreel-ui/src/helpers/log.rs
//
// Logging setup for the storyreel binary.
//
// Library code only emits `tracing` events; installing a subscriber is the
// binary's job. Output goes to stderr so the rendered markup on stdout stays
// clean enough to pipe into a file.
//
// Filter: `RUST_LOG` when set, otherwise `info` (`--verbose` → `debug`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
