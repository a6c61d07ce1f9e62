// HTTP client seam.
// The fetcher depends on the `HttpClient` trait; `ReqwestClient` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;

use crate::error::{FetchError, Result};

use super::request::FetchOptions;
use super::response::HttpResponse;

/// Something that can send a request and hand back the raw response.
///
/// Implementations report transport failures as errors. A response with a
/// non-2xx status is still `Ok`; the caller inspects [`HttpResponse::is_ok`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, url: &str, options: &FetchOptions) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create a client with reqwest's defaults (no timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("freshfetch/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Transport)?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, url: &str, options: &FetchOptions) -> Result<HttpResponse> {
        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(options.headers.clone());

        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(FetchError::Transport)?;

        let status = response.status();
        let final_url = response.url().to_string();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(FetchError::Transport))
            .boxed();

        Ok(HttpResponse::new(status, final_url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout_builds() {
        assert!(ReqwestClient::with_timeout(Some(Duration::from_secs(5))).is_ok());
        assert!(ReqwestClient::with_timeout(None).is_ok());
    }

    #[test]
    fn test_from_client_wraps_given_client() {
        let inner = Client::builder().build().unwrap();
        let client = ReqwestClient::from_client(inner);
        assert!(format!("{:?}", client).contains("ReqwestClient"));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_transport_error() {
        let client = ReqwestClient::new();
        let result = client.execute("not a url", &FetchOptions::get()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
