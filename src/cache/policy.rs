// Cache policy types.
// Per-request freshness settings and fetcher-wide handling of stale entries and keys.

use std::time::Duration;

/// Default time-to-live for cached responses: 20 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(20 * 60);

/// Per-request cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Whether a cached entry may be served. Successful fetches are stored either way.
    pub enabled: bool,
    /// Maximum age of an entry that is still served without a fetch.
    pub ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CachePolicy {
    /// Policy that always goes to the network.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Enabled policy with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { enabled: true, ttl }
    }
}

/// Result of comparing an entry's age against a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// What to do after revalidating a stale entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// The revalidation fetch answers the request.
    #[default]
    ReturnRevalidated,
    /// Revalidate, discard the outcome, then issue a second fetch whose outcome
    /// answers the request. Two network calls per stale lookup.
    RevalidateThenFetch,
}

/// Which identifier entries are stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// The key exactly as the caller passed it, before the base address is
    /// prepended. An internal `/x` and an external `/x` share one entry.
    #[default]
    Raw,
    /// The fully resolved request address.
    Resolved,
}
