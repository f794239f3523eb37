//! Error types for the yadisk crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to the Disk API or saving a file.
#[derive(Error, Debug)]
pub enum DiskError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error, request={url}; httpcode={status}{}", fmt_message(.message))]
    ApiError {
        url: String,
        status: u16,
        message: Option<String>,
    },

    #[error("Failed to decode JSON response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid resource path: {0:?}")]
    InvalidPath(String),

    #[error("Invalid public link or key: {0}")]
    InvalidPublicKey(String),

    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
}

fn fmt_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({})", m),
        _ => String::new(),
    }
}

/// Result type alias for DiskError.
pub type Result<T> = std::result::Result<T, DiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_without_message() {
        let err = DiskError::ApiError {
            url: "https://example.com/x?path=a".to_string(),
            status: 404,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "API error, request=https://example.com/x?path=a; httpcode=404"
        );
    }

    #[test]
    fn test_api_error_display_with_message() {
        let err = DiskError::ApiError {
            url: "https://example.com/x".to_string(),
            status: 401,
            message: Some("Unauthorized".to_string()),
        };
        assert!(err.to_string().ends_with("httpcode=401 (Unauthorized)"));
    }
}
