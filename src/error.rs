// Error types for freshfetch.
// Covers transport, HTTP status, decoding, and configuration failures.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {0}")]
    Status(StatusCode),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Missing {0} environment variable")]
    MissingBaseUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Whether the failure came from the server answering with a non-2xx status.
    ///
    /// Status failures are reported to the caller but not logged as errors.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status(_))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(FetchError::Status(StatusCode::NOT_FOUND).is_status());
        assert!(!FetchError::Other("boom".into()).is_status());
        assert!(!FetchError::MissingBaseUrl("URL".into()).is_status());
    }

    #[test]
    fn test_display_messages() {
        let err = FetchError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Request failed with status 502 Bad Gateway");

        let err = FetchError::MissingBaseUrl("URL".into());
        assert_eq!(err.to_string(), "Missing URL environment variable");
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Json(_)));
    }
}
