// Cached fetcher.
// Serves fresh cache entries, otherwise fetches, decodes, and stores the response.

use std::sync::Arc;

use bytes::BytesMut;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{CacheStore, KeyPolicy, StalePolicy};
use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, ReqwestClient};
use crate::query::{Query, QueryResult};

/// Issues queries through an [`HttpClient`] and caches decoded responses.
///
/// Cloning is cheap and clones share the client and cache. Concurrent queries
/// for the same key are not coalesced: each one reaches the network and the
/// last to finish decides what stays cached.
#[derive(Clone)]
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
    cache: Arc<CacheStore>,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a fetcher with its own empty cache.
    pub fn new(client: Arc<dyn HttpClient>, config: FetcherConfig) -> Self {
        Self {
            client,
            cache: Arc::new(CacheStore::new()),
            config,
        }
    }

    /// Create a fetcher backed by reqwest.
    pub fn with_reqwest(config: FetcherConfig) -> Result<Self> {
        let client = ReqwestClient::with_timeout(config.timeout)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Create a reqwest-backed fetcher configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::with_reqwest(FetcherConfig::from_env()?)
    }

    /// Use `cache` instead of the fetcher's own store.
    pub fn with_cache(mut self, cache: Arc<CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Start a query for `key` using the configured default TTL.
    pub fn query(&self, key: impl Into<String>) -> Query {
        Query::new(key).ttl(self.config.default_ttl)
    }

    /// Run `query`, serving from cache while the entry is fresh.
    ///
    /// Successful responses are stored even when the query has caching
    /// disabled; the flag only controls whether an existing entry may be served.
    pub async fn fetch<T: DeserializeOwned>(&self, query: Query) -> QueryResult<T> {
        // Raw keys never need the base address until the network is involved.
        let cache_key = match self.config.key_policy {
            KeyPolicy::Raw => query.key.clone(),
            KeyPolicy::Resolved => match self.resolve_address(&query) {
                Ok(address) => address,
                Err(err) => return settle(&query.key, Err(err)),
            },
        };

        if query.cache.enabled {
            if let Some(entry) = self.cache.get(&cache_key) {
                if entry.is_fresh(query.cache.ttl) {
                    match serde_json::from_value::<T>(entry.value) {
                        Ok(data) => {
                            debug!(key = %cache_key, "cache hit");
                            return QueryResult::success(data);
                        }
                        Err(err) => {
                            warn!(
                                key = %cache_key,
                                error = %err,
                                "cached value has unexpected shape, refetching"
                            );
                        }
                    }
                } else {
                    debug!(key = %cache_key, age = ?entry.age(), "cache entry stale");
                    let revalidated = settle(
                        &cache_key,
                        self.load::<T>(&cache_key, &query).await,
                    );
                    if self.config.stale_policy == StalePolicy::ReturnRevalidated {
                        return revalidated;
                    }
                }
            } else {
                debug!(key = %cache_key, "cache miss");
            }
        }

        settle(
            &cache_key,
            self.load::<T>(&cache_key, &query).await,
        )
    }

    /// Run `query` against a fully qualified address, ignoring the base address.
    pub async fn fetch_external<T: DeserializeOwned>(&self, query: Query) -> QueryResult<T> {
        self.fetch(query.external(true)).await
    }

    /// Run `query` reading the body incrementally, with no caching at all.
    ///
    /// The chunks are accumulated, decoded as UTF-8, then parsed as JSON. Unlike
    /// [`Fetcher::fetch`], an empty body is a decode failure.
    pub async fn stream<T: DeserializeOwned>(&self, query: Query) -> QueryResult<T> {
        settle(&query.key, self.read_stream(&query).await)
    }

    fn resolve_address(&self, query: &Query) -> Result<String> {
        self.config.base_url.join(&query.key, query.external)
    }

    /// Fetch and decode `query`, storing the decoded value under `cache_key`.
    async fn load<T: DeserializeOwned>(&self, cache_key: &str, query: &Query) -> Result<T> {
        let address = self.resolve_address(query)?;
        let response = self.client.execute(&address, &query.options).await?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status()));
        }

        let value = response.json().await?;
        let data = T::deserialize(&value)?;
        self.cache.store(cache_key, value);

        Ok(data)
    }

    async fn read_stream<T: DeserializeOwned>(&self, query: &Query) -> Result<T> {
        let address = self.resolve_address(query)?;
        let mut response = self.client.execute(&address, &query.options).await?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status()));
        }

        let mut buffer = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }

        let text = String::from_utf8(buffer.to_vec())?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("cache_entries", &self.cache.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Collapse a fetch outcome into the envelope, logging anything but a status failure.
fn settle<T>(key: &str, result: Result<T>) -> QueryResult<T> {
    match result {
        Ok(data) => QueryResult::success(data),
        Err(err) if err.is_status() => {
            debug!(key = %key, error = %err, "request not ok");
            QueryResult::failure()
        }
        Err(err) => {
            warn!(key = %key, error = %err, "request failed");
            QueryResult::failure()
        }
    }
}
