use std::time::Duration;

use assetdesk_core::allocation::AllocationPolicy;
use assetdesk_db::store::DEFAULT_FETCH_BATCH_SIZE;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Retry budget and backoff for asset identifier allocation.
    pub allocation: AllocationPolicy,
    /// Rows per batch when reading a category's asset ids (default: `1000`).
    pub fetch_batch_size: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `ALLOC_MAX_ATTEMPTS`     | `3`                     |
    /// | `ALLOC_BACKOFF_MIN_MS`   | `200`                   |
    /// | `ALLOC_BACKOFF_MAX_MS`   | `500`                   |
    /// | `ASSET_FETCH_BATCH_SIZE` | `1000`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = AllocationPolicy::default();

        let max_attempts: u32 = std::env::var("ALLOC_MAX_ATTEMPTS")
            .map(|v| v.parse().expect("ALLOC_MAX_ATTEMPTS must be a valid u32"))
            .unwrap_or(defaults.max_attempts);

        let backoff_min_ms: u64 = std::env::var("ALLOC_BACKOFF_MIN_MS")
            .map(|v| v.parse().expect("ALLOC_BACKOFF_MIN_MS must be a valid u64"))
            .unwrap_or(defaults.backoff_min.as_millis() as u64);

        let backoff_max_ms: u64 = std::env::var("ALLOC_BACKOFF_MAX_MS")
            .map(|v| v.parse().expect("ALLOC_BACKOFF_MAX_MS must be a valid u64"))
            .unwrap_or(defaults.backoff_max.as_millis() as u64);

        let fetch_batch_size: i64 = std::env::var("ASSET_FETCH_BATCH_SIZE")
            .map(|v| v.parse().expect("ASSET_FETCH_BATCH_SIZE must be a valid i64"))
            .unwrap_or(DEFAULT_FETCH_BATCH_SIZE);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            allocation: AllocationPolicy {
                max_attempts,
                backoff_min: Duration::from_millis(backoff_min_ms),
                backoff_max: Duration::from_millis(backoff_max_ms),
            },
            fetch_batch_size,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
