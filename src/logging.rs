//! Logging initialisation for eggtimer.
//!
//! Logs go to stderr, filtered by `RUST_LOG`. Without `RUST_LOG` the level
//! is `warn`, or `info` when `EGGTIMER_LOG=1`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
fn default_directive() -> &'static str {
    if std::env::var("EGGTIMER_LOG").as_deref() == Ok("1") {
        "info"
    } else {
        "warn"
    }
}

/// Initialise the global tracing subscriber.
///
/// Call once from `main`. Library code never calls this.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive()));

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
