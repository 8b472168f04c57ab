//! Core configuration.

use std::path::PathBuf;

/// Configuration for connecting the core to its backend and cache.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Backend base URL including the API prefix
    /// (e.g., "http://localhost:8080/api").
    pub base_url: String,

    /// Request timeout in seconds. A dead remote must fail fast so the
    /// cache fallback can take over instead of blocking the caller.
    pub timeout_secs: u64,

    /// Path of the redb cache file.
    pub cache_path: PathBuf,

    /// Cached bearer token from a previous admin login, if any.
    pub token: Option<String>,
}

impl CoreConfig {
    /// Create a configuration with defaults for everything but the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            cache_path: PathBuf::from("room911-cache.redb"),
            token: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the cache file path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load configuration from the environment (and `.env` if present).
    ///
    /// Recognized variables: `ROOM911_API_URL`, `ROOM911_TIMEOUT_SECS`,
    /// `ROOM911_CACHE_PATH`.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        if let Ok(url) = std::env::var("ROOM911_API_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("ROOM911_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        if let Ok(path) = std::env::var("ROOM911_CACHE_PATH") {
            config.cache_path = PathBuf::from(path);
        }
        config
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
