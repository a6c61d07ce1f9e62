//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use freshfetch::{
    FetchError, FetchOptions, Fetcher, FetcherConfig, HttpClient, HttpResponse, Result,
};
use parking_lot::Mutex;
use reqwest::StatusCode;

pub const BASE_URL: &str = "https://api.example.com";

/// A canned reply for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status with the body delivered as one chunk.
    Body(StatusCode, String),
    /// Status with the body delivered as the given chunks.
    Chunks(StatusCode, Vec<Vec<u8>>),
    /// Transport failure.
    Fail(String),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Body(StatusCode::OK, body.to_string())
    }

    pub fn status(status: StatusCode) -> Self {
        Reply::Body(status, String::new())
    }
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub options: FetchOptions,
}

/// In-memory [`HttpClient`] that answers from a script and records every call.
///
/// Replies pushed with `push` are used once, in order; after that the `always`
/// reply (if any) answers everything.
#[derive(Default)]
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Reply) {
        self.queue.lock().push_back(reply);
    }

    pub fn always(&self, reply: Reply) {
        *self.fallback.lock() = Some(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|call| call.url.clone()).collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, url: &str, options: &FetchOptions) -> Result<HttpResponse> {
        self.calls.lock().push(Call {
            url: url.to_string(),
            options: options.clone(),
        });

        // Let other in-flight requests reach the client before this one answers.
        tokio::task::yield_now().await;

        let reply = self
            .queue
            .lock()
            .pop_front()
            .or_else(|| self.fallback.lock().clone())
            .ok_or_else(|| FetchError::Other(format!("no scripted reply for {}", url)))?;

        match reply {
            Reply::Body(status, body) => Ok(HttpResponse::from_bytes(status, url, body)),
            Reply::Chunks(status, chunks) => Ok(HttpResponse::from_chunks(
                status,
                url,
                chunks.into_iter().map(Bytes::from).collect(),
            )),
            Reply::Fail(message) => Err(FetchError::Other(message)),
        }
    }
}

/// A fetcher against [`BASE_URL`] with default policies.
pub fn fetcher(client: &Arc<ScriptedClient>) -> Fetcher {
    fetcher_with(client, FetcherConfig::with_base_url(BASE_URL))
}

pub fn fetcher_with(client: &Arc<ScriptedClient>, config: FetcherConfig) -> Fetcher {
    Fetcher::new(client.clone(), config)
}
