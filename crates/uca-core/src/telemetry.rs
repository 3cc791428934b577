//! Log subscriber for the `uca` binary.
//!
//! `uca schema targets` and `uca schema diff` print their results on stdout,
//! in `--format json` as a single JSON document. Log lines therefore always
//! go to stderr, so piping stdout into a JSON consumer never picks up a log
//! line.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json` each log line is a
/// JSON object. A subscriber that is already installed is left in place.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // Exactly one of the two layers is present; `None` layers are no-ops.
    let (json_layer, text_layer) = if json {
        let layer = fmt::layer().json().with_writer(std::io::stderr);
        (Some(layer), None)
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (None, Some(layer))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();
}
