use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{LOG_DIR, LOG_FILE_PREFIX};

/// Initializes the logging system with both console and file output.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at info.
pub fn init_logging() {
    let _ = fs::create_dir_all(LOG_DIR);

    // Daily-rotated JSON file, written off the request path
    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("order_agent=info,warn"));

    // try_init so a second call (tests, embedded use) is a no-op instead of a panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Keep the writer alive for the life of the process so buffered lines get flushed
    std::mem::forget(_guard);
}
