use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::config::LogLevel;

/// Install the diagnostic subscriber, writing to stderr.
///
/// The filter comes only from `-l`; the environment is not consulted.
/// Returns false when a global subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    let env_filter = EnvFilter::default().add_directive(level.as_filter().into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(SystemTime)
        .with_target(true)
        .with_thread_names(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
