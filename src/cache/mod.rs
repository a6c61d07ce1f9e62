// Cache module for in-memory response caching.
// Stores decoded JSON responses keyed by request identifier, judged fresh by TTL.

pub mod policy;
pub mod store;

pub use policy::{CachePolicy, DEFAULT_TTL, Freshness, KeyPolicy, StalePolicy};
pub use store::{CacheEntry, CacheStore};
