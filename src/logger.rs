pub use tracing::{debug, error, info, instrument, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "freshscan_rs=info";

/// Installs the global subscriber, logging to stderr so stdout stays free
/// for scan updates.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

pub fn init_with_default(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Stage timings are only worth printing when someone asked for debug.
    let span_events = if env_filter.to_string().contains("debug") {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
