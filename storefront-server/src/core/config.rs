use std::path::PathBuf;
use std::time::Duration;

/// Storefront server configuration
///
/// # Environment
///
/// Every field can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database, uploads and logs live here |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | tracing filter directive |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
/// | MAX_UPLOAD_BYTES | 52428800 | Limit per uploaded document |
/// | MAX_FILES_PER_ORDER | 20 | Documents accepted in one order |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Grace period for in-flight requests |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/print HTTP_PORT=8080 cargo run -p storefront-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub max_upload_bytes: usize,
    pub max_files_per_order: usize,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024),
            max_files_per_order: env_or("MAX_FILES_PER_ORDER", 20),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 10_000),
        }
    }

    /// Override the work dir and port, keep the rest from the environment
    ///
    /// Mostly for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.work_dir().join("storefront.redb")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir().join("uploads")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Multipart body limit for one order: every file plus the JSON part
    pub fn order_body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_mul(self.max_files_per_order)
            .saturating_add(64 * 1024)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_paths() {
        let config = Config::with_overrides("/tmp/print-shop", 8080);
        assert_eq!(config.http_port, 8080);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/print-shop/storefront.redb")
        );
        assert_eq!(config.uploads_dir(), PathBuf::from("/tmp/print-shop/uploads"));
    }

    #[test]
    fn test_body_limit_covers_all_files() {
        let mut config = Config::with_overrides("/tmp", 0);
        config.max_upload_bytes = 1000;
        config.max_files_per_order = 3;
        assert!(config.order_body_limit() > 3000);
    }
}
