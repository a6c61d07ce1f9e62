// freshfetch: HTTP fetching with an in-memory, TTL-based response cache.
// Library entry point; re-exports the types most callers need.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod query;

pub use cache::{CacheEntry, CachePolicy, CacheStore, DEFAULT_TTL, KeyPolicy, StalePolicy};
pub use config::{BaseUrl, FetcherConfig};
pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use http::{FetchOptions, HttpClient, HttpResponse, ReqwestClient};
pub use query::{Query, QueryResult};
