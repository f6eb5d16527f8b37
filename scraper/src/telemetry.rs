use common::log_filter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global log subscriber for a verbosity level.
///
/// Logs go to stderr so the console report on stdout stays readable.
/// Calling this more than once is harmless: later calls are ignored.
pub fn init_telemetry(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(log_filter(verbosity)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
