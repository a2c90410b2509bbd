//! Tracing initialisation for wallgrab binaries.
//!
//! Library code logs through both `tracing` and `log`; [`init_tracing`]
//! routes `log` records into the same subscriber.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Installs the global subscriber.
///
/// * `json`: emit newline-delimited JSON instead of human-readable lines.
/// * `level`: default verbosity when `RUST_LOG` is not set.
///
/// Logs go to stderr so stdout stays free for run output. Safe to call more
/// than once; only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let installed = if json {
        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .json(),
        );
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = Registry::default().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        );
        tracing::subscriber::set_global_default(subscriber).is_ok()
    };

    if installed {
        // Bridge `log` macros used by the scanner, storage and extractor
        tracing_log::LogTracer::init().ok();
    }
}
