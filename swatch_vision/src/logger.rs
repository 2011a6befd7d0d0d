//! Process-wide `tracing` setup shared by the server and the tester binaries.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Filter used when `RUST_LOG` is unset: the picker's own crates at `info`, everything
/// else (hyper, axum, image decoders) only at `warn`.
pub const DEFAULT_DIRECTIVES: &str =
    "warn,swatch_vision=info,swatch_vision_server=info,snapshot_tester=info";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber. Span close events (which time each extraction and
/// request) are only emitted when some directive asks for debug output.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn init() {
    let filter = default_filter();
    let span_events = if filter.to_string().contains("debug") {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
