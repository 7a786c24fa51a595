//! Harness configuration from environment variables.
//!
//! `.env` is loaded in `main`; every variable is optional and falls back to
//! the library defaults or the constants below. Command-line flags override
//! whatever is read here.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use review::config::EngineConfig;

const DEFAULT_BACKEND_LATENCY_MS: u64 = 40;
const DEFAULT_BACKEND_FAIL_EVERY: u64 = 0;
const DEFAULT_BACKEND_RESIZE_RETRIES: usize = 2;
const DEFAULT_BACKEND_RETRY_BASE_MS: u64 = 20;

/// Simulated backend behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendConfig {
    /// Delay before each attempt resolves.
    pub latency_ms: u64,
    /// Fail every Nth attempt across all mutations; 0 never fails.
    pub fail_every: u64,
    /// Extra attempts for a failed resize. Moves are never retried.
    pub resize_retries: usize,
    /// Base delay for linear retry back-off.
    pub retry_base_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_BACKEND_LATENCY_MS,
            fail_every: DEFAULT_BACKEND_FAIL_EVERY,
            resize_retries: DEFAULT_BACKEND_RESIZE_RETRIES,
            retry_base_ms: DEFAULT_BACKEND_RETRY_BASE_MS,
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            latency_ms: env_parse("REVIEW_BACKEND_LATENCY_MS", defaults.latency_ms),
            fail_every: env_parse("REVIEW_BACKEND_FAIL_EVERY", defaults.fail_every),
            resize_retries: env_parse("REVIEW_BACKEND_RESIZE_RETRIES", defaults.resize_retries),
            retry_base_ms: env_parse("REVIEW_BACKEND_RETRY_BASE_MS", defaults.retry_base_ms),
        }
    }
}

/// Everything a replay needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewConfig {
    pub engine: EngineConfig,
    pub backend: BackendConfig,
}

impl ReviewConfig {
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            resize_debounce_ms: env_parse("REVIEW_RESIZE_DEBOUNCE_MS", defaults.resize_debounce_ms),
            settle_grace_ms: env_parse("REVIEW_SETTLE_GRACE_MS", defaults.settle_grace_ms),
            min_resize_px: env_parse("REVIEW_MIN_RESIZE_PX", defaults.min_resize_px),
            ..defaults
        };
        Self { engine, backend: BackendConfig::from_env() }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
