// Query description and result envelope.
// A `Query` says what to fetch and how to cache it; a `QueryResult` is what every caller gets back.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::cache::CachePolicy;
use crate::http::FetchOptions;

/// A request to run through the [`crate::Fetcher`].
#[derive(Debug, Clone)]
pub struct Query {
    /// Path relative to the base address, or a full address when `external`.
    pub key: String,
    pub options: FetchOptions,
    pub cache: CachePolicy,
    /// Skip the base address and request `key` as given.
    pub external: bool,
}

impl Query {
    /// GET `key` relative to the base address, cached with the default policy.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            options: FetchOptions::default(),
            cache: CachePolicy::default(),
            external: false,
        }
    }

    pub fn external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache = policy;
        self
    }

    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.options.method = method;
        self
    }
}

/// Outcome of a query.
///
/// Failures of any kind collapse to `error: true` with no data. `is_loading`
/// is always settled to `false` by the time a result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub is_loading: bool,
    pub error: bool,
    pub data: Option<T>,
}

impl<T> QueryResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            is_loading: false,
            error: false,
            data: Some(data),
        }
    }

    pub fn failure() -> Self {
        Self {
            is_loading: false,
            error: true,
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.error
    }

    /// The data, if the query succeeded.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
