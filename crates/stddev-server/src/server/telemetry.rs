//! Tracing subscriber setup.
//!
//! Spans and events are logged as human-readable console output, filtered
//! through `RUST_LOG` with an `info` default. There is no exporter stack;
//! everything the service reports goes through `tracing` macros and ends up
//! on the console.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// Must be called once, before the first span or event is emitted.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .init();
}
