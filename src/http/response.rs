// HTTP response wrapper.
// Status plus a chunked body that can be read in one shot or incrementally.

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Result;

/// Body of a response as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// A received response whose body has not been consumed yet.
pub struct HttpResponse {
    status: StatusCode,
    url: String,
    body: BodyStream,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    pub fn new(status: StatusCode, url: impl Into<String>, body: BodyStream) -> Self {
        Self {
            status,
            url: url.into(),
            body,
        }
    }

    /// Response with the whole body in a single chunk.
    pub fn from_bytes(status: StatusCode, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::from_chunks(status, url, vec![body.into()])
    }

    /// Response whose body arrives as the given chunks, in order.
    pub fn from_chunks(status: StatusCode, url: impl Into<String>, chunks: Vec<Bytes>) -> Self {
        let body = stream::iter(chunks.into_iter().map(Ok)).boxed();
        Self::new(status, url, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the status is in the 2xx class.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Read the next body chunk. `None` once the body is exhausted.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.body.next().await.transpose()
    }

    /// Read the whole body.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    /// Read the whole body and parse it as JSON.
    ///
    /// A blank body decodes to `Value::Null`.
    pub async fn json(self) -> Result<Value> {
        let body = self.bytes().await?;
        decode_json(&body)
    }
}

/// Parse a JSON document, treating a blank body as `null`.
pub fn decode_json(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;

    #[tokio::test]
    async fn test_bytes_concatenates_chunks() {
        let response = HttpResponse::from_chunks(
            StatusCode::OK,
            "https://example.com",
            vec![Bytes::from_static(b"{\"a\":"), Bytes::from_static(b"1}")],
        );

        assert_eq!(response.bytes().await.unwrap(), Bytes::from_static(b"{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_chunk_reads_incrementally() {
        let mut response = HttpResponse::from_chunks(
            StatusCode::OK,
            "https://example.com",
            vec![Bytes::from_static(b"ab"), Bytes::from_static(b"cd")],
        );

        assert_eq!(response.chunk().await.unwrap(), Some(Bytes::from_static(b"ab")));
        assert_eq!(response.chunk().await.unwrap(), Some(Bytes::from_static(b"cd")));
        assert_eq!(response.chunk().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_chunk_error_surfaces() {
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"{")),
            Err(FetchError::Other("connection reset".into())),
        ])
        .boxed();
        let response = HttpResponse::new(StatusCode::OK, "https://example.com", body);

        assert!(matches!(response.bytes().await, Err(FetchError::Other(_))));
    }

    #[tokio::test]
    async fn test_json() {
        let response =
            HttpResponse::from_bytes(StatusCode::OK, "https://example.com", r#"{"id":1}"#);
        assert_eq!(response.json().await.unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_status_and_url_accessors() {
        let response = HttpResponse::from_bytes(StatusCode::CREATED, "https://example.com/a", "");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.url(), "https://example.com/a");
    }

    #[test]
    fn test_is_ok_is_2xx() {
        let ok = HttpResponse::from_bytes(StatusCode::NO_CONTENT, "u", "");
        let redirect = HttpResponse::from_bytes(StatusCode::FOUND, "u", "");
        let missing = HttpResponse::from_bytes(StatusCode::NOT_FOUND, "u", "");

        assert!(ok.is_ok());
        assert!(!redirect.is_ok());
        assert!(!missing.is_ok());
    }

    #[test]
    fn test_decode_blank_body_is_null() {
        assert_eq!(decode_json(b"").unwrap(), Value::Null);
        assert_eq!(decode_json(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(decode_json(b"<html>"), Err(FetchError::Json(_))));
    }
}
