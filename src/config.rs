//! Runtime configuration for the proxy
//!
//! All process-wide constants (downstream endpoint, cache key, retention TTL,
//! window size, day-boundary offset) live in an explicit [`ProxyConfig`]
//! struct that is passed into the components at construction, so tests can
//! vary them. Values are loaded from the environment (a `.env` file is
//! honored by the binary) with compile-time defaults.

use std::env;

use chrono::{FixedOffset, Offset, Utc};

use crate::history::MAX_DAYS;

/// Default downstream endpoint returning the current index value
pub const DEFAULT_API_URL: &str = "https://api.fearandgreedindex.io/v1/current";

/// Store key under which the history record is kept
pub const CACHE_KEY: &str = "fng_history";

/// Expiry applied on every store write, in seconds (48 hours)
///
/// A safety net against orphaned keys, independent of the 30-entry trim.
pub const CACHE_TTL_SECS: u64 = 172_800;

const ENV_API_URL: &str = "FNG_API_URL";
const ENV_API_KEY: &str = "FNG_API_KEY";
const ENV_REDIS_URL: &str = "REDIS_URL";
const ENV_UTC_OFFSET: &str = "FNG_UTC_OFFSET_HOURS";

/// Configuration shared by the downstream client, the freshness logic and
/// the HTTP handler
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Downstream endpoint URL
    pub api_url: String,
    /// Secret credential sent in the downstream request header; its absence
    /// fails individual requests, not process startup
    pub api_key: Option<String>,
    /// Store key for the cached record
    pub cache_key: String,
    /// Expiry applied on every store write, in seconds
    pub cache_ttl_secs: u64,
    /// Sliding-window length in days
    pub max_days: usize,
    /// Fixed UTC offset defining the calendar-day boundary and date labels
    pub utc_offset: FixedOffset,
    /// Redis connection URL; the file store is used when absent
    pub redis_url: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            cache_key: CACHE_KEY.to_string(),
            cache_ttl_secs: CACHE_TTL_SECS,
            max_days: MAX_DAYS,
            utc_offset: Utc.fix(),
            redis_url: None,
        }
    }
}

impl ProxyConfig {
    /// Loads configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let utc_offset_hours = env::var(ENV_UTC_OFFSET)
            .ok()
            .and_then(|raw| raw.parse::<i32>().ok())
            .unwrap_or(0);

        Self {
            api_url: env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var(ENV_API_KEY).ok().filter(|key| !key.is_empty()),
            redis_url: env::var(ENV_REDIS_URL).ok().filter(|url| !url.is_empty()),
            utc_offset: offset_from_hours(utc_offset_hours),
            ..Self::default()
        }
    }
}

/// Converts a whole-hour offset into a `FixedOffset`, treating out-of-range
/// values as UTC
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}
