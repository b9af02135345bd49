//! Logging initialization shared by both binaries.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when it parses; otherwise `default_level` applies to this crate.
/// Logs go to stderr so stdout stays free for data.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), default_level))
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
