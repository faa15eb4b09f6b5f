//! Logging Infrastructure
//!
//! `tracing` subscriber with an env filter and optional daily rolling files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Log file prefix inside `LOG_DIR`
const LOG_FILE_PREFIX: &str = "storefront-server";

/// Filter from `RUST_LOG` when set, else from the configured level
fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logger on stdout
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = build_filter(log_level.unwrap_or("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
                let _ = subscriber
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Log directory {dir} unavailable ({e}), logging to stdout"),
        }
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let filter = build_filter("not a [valid directive");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_double_init_is_harmless() {
        init_logger();
        init_logger_with_file(Some("debug"), None);
    }
}
