//! Runtime configuration from the environment.

use crate::entur::EnturConfig;
use crate::error::Error;
use crate::store::CacheFileConfig;

/// Overrides the cache file location.
pub const ENV_CACHE: &str = "REISE_CACHE";
/// Overrides the `ET-Client-Name` header.
pub const ENV_CLIENT_NAME: &str = "REISE_CLIENT_NAME";
pub const ENV_GEOCODER_URL: &str = "REISE_GEOCODER_URL";
pub const ENV_JOURNEY_PLANNER_URL: &str = "REISE_JOURNEY_PLANNER_URL";
/// Request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "REISE_TIMEOUT_SECS";

/// Everything the binary needs to know before running a command.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheFileConfig,
    pub client: EnturConfig,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup. Unset or empty
    /// variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cache = match get(ENV_CACHE) {
            Some(path) => CacheFileConfig::new(path),
            None => CacheFileConfig::default(),
        };

        let mut client = match get(ENV_CLIENT_NAME) {
            Some(name) => EnturConfig::new(name),
            None => EnturConfig::default(),
        };
        if let Some(url) = get(ENV_GEOCODER_URL) {
            client = client.with_geocoder_url(url);
        }
        if let Some(url) = get(ENV_JOURNEY_PLANNER_URL) {
            client = client.with_journey_planner_url(url);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "{ENV_TIMEOUT_SECS} must be a positive number, got '{raw}'"
                    ))
                })?;
            client = client.with_timeout(secs);
        }

        Ok(Self { cache, client })
    }
}
