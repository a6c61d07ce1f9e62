// Fetcher configuration.
// Resolves the base address for relative requests and loads settings from the environment.

use std::time::Duration;

use crate::cache::{DEFAULT_TTL, KeyPolicy, StalePolicy};
use crate::error::{FetchError, Result};

/// Environment variable holding the base address for relative requests.
pub const BASE_URL_VAR: &str = "URL";
/// Environment variable overriding the default cache TTL, in seconds.
pub const TTL_VAR: &str = "FRESHFETCH_TTL_SECS";
/// Environment variable setting a transport timeout, in seconds.
pub const TIMEOUT_VAR: &str = "FRESHFETCH_TIMEOUT_SECS";

/// Where the base address for non-external requests comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    /// A fixed address supplied at construction.
    Fixed(String),
    /// Read from the named environment variable on every request.
    Env(String),
}

impl Default for BaseUrl {
    fn default() -> Self {
        BaseUrl::Env(BASE_URL_VAR.to_string())
    }
}

impl BaseUrl {
    /// Current value of the base address.
    pub fn resolve(&self) -> Result<String> {
        match self {
            BaseUrl::Fixed(url) => Ok(url.clone()),
            BaseUrl::Env(var) => {
                std::env::var(var).map_err(|_| FetchError::MissingBaseUrl(var.clone()))
            }
        }
    }

    /// Build the address to request for `key`.
    ///
    /// External keys are used verbatim. Everything else is the base address
    /// followed by the key, concatenated without inserting or trimming slashes.
    pub fn join(&self, key: &str, external: bool) -> Result<String> {
        if external {
            return Ok(key.to_string());
        }
        Ok(format!("{}{}", self.resolve()?, key))
    }
}

/// Settings shared by every request issued through a [`crate::Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub base_url: BaseUrl,
    /// TTL given to queries built with [`crate::Fetcher::query`].
    pub default_ttl: Duration,
    /// Transport timeout applied by the reqwest-backed client.
    pub timeout: Option<Duration>,
    pub stale_policy: StalePolicy,
    pub key_policy: KeyPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            default_ttl: DEFAULT_TTL,
            timeout: None,
            stale_policy: StalePolicy::default(),
            key_policy: KeyPolicy::default(),
        }
    }
}

impl FetcherConfig {
    /// Configuration with a fixed base address.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: BaseUrl::Fixed(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment.
    ///
    /// The base address itself stays lazy: it is read from `URL` at request time.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ttl) = lookup(TTL_VAR) {
            config.default_ttl = parse_secs(TTL_VAR, &ttl)?;
        }

        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            config.timeout = Some(parse_secs(TIMEOUT_VAR, &timeout)?);
        }

        Ok(config)
    }
}

fn parse_secs(var: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| FetchError::Other(format!("{} must be a number of seconds: {}", var, e)))
}
