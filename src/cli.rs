//! Command-line interface for the `freshfetch` binary
//!
//! Parses flags with clap and turns them into a [`FetcherConfig`] plus the
//! [`Query`] to run.

use std::time::Duration;

use clap::Parser;
use reqwest::Method;

use crate::cache::{KeyPolicy, StalePolicy};
use crate::config::{BASE_URL_VAR, BaseUrl, FetcherConfig};
use crate::error::{FetchError, Result};
use crate::http::FetchOptions;
use crate::query::Query;

/// Fetch a JSON resource, caching the response in memory
#[derive(Parser, Debug)]
#[command(name = "freshfetch")]
#[command(about = "Fetch JSON over HTTP with a TTL response cache")]
#[command(version)]
pub struct Cli {
    /// Path relative to the base address, or a full URL with --external
    pub key: String,

    /// Base address prepended to relative paths (defaults to $URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Treat KEY as a fully qualified URL
    #[arg(long)]
    pub external: bool,

    /// Cache time-to-live in seconds
    #[arg(long, value_name = "SECS")]
    pub ttl: Option<u64>,

    /// Never serve a cached response
    #[arg(long)]
    pub no_cache: bool,

    /// Read the body incrementally; bypasses the cache entirely
    #[arg(long)]
    pub stream: bool,

    /// Run the same query this many times in a row
    #[arg(long, default_value_t = 1)]
    pub repeat: u32,

    /// On a stale entry, revalidate and then fetch again
    #[arg(long)]
    pub revalidate_then_fetch: bool,

    /// Key cache entries by resolved address instead of the raw KEY
    #[arg(long)]
    pub key_by_address: bool,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(long = "header", short = 'H', value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,
}

impl Cli {
    /// Fetcher configuration: environment settings overridden by flags.
    pub fn config(&self) -> Result<FetcherConfig> {
        let mut config = FetcherConfig::from_env()?;

        config.base_url = match &self.base_url {
            Some(url) => BaseUrl::Fixed(url.clone()),
            None => BaseUrl::Env(BASE_URL_VAR.to_string()),
        };
        if let Some(ttl) = self.ttl {
            config.default_ttl = Duration::from_secs(ttl);
        }
        if self.revalidate_then_fetch {
            config.stale_policy = StalePolicy::RevalidateThenFetch;
        }
        if self.key_by_address {
            config.key_policy = KeyPolicy::Resolved;
        }

        Ok(config)
    }

    /// The query described by the flags, using `default_ttl` unless --ttl was given.
    pub fn query(&self, default_ttl: Duration) -> Result<Query> {
        let method = Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|_| FetchError::Other(format!("Invalid method: {}", self.method)))?;

        let mut options = FetchOptions::get().with_method(method);
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            options = options.with_header(name, value)?;
        }
        if let Some(data) = &self.data {
            options = options.with_body(data.clone());
        }

        Ok(Query::new(self.key.clone())
            .external(self.external)
            .cache_enabled(!self.no_cache)
            .ttl(self.ttl.map(Duration::from_secs).unwrap_or(default_ttl))
            .options(options))
    }
}

/// Split a `NAME:VALUE` header argument.
pub fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| FetchError::InvalidHeader(format!("expected NAME:VALUE, got '{}'", raw)))?;
    Ok((name.trim(), value.trim()))
}
