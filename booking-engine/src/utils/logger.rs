//! Logging Infrastructure
//!
//! Structured logging setup for demos, tests and embedding applications.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional daily rolling file output
///
/// `RUST_LOG` directives win over `log_level` (e.g.
/// `RUST_LOG=booking_engine=debug,analytics=info`). Safe to call more than
/// once; later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    match log_dir.map(Path::new).filter(|p| p.is_dir()) {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "booking-engine");
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
        }
        None => {
            let _ = subscriber.try_init();
        }
    }
}
