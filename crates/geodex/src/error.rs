//! Error types for geodex
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for geodex
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for geodex
pub type Result<T> = std::result::Result<T, AppError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    format!("Network error: {e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = AppError::Http {
            status: 404,
            url: "https://restcountries.com/v3.1/alpha/zz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 from https://restcountries.com/v3.1/alpha/zz"
        );
    }

    #[test]
    fn test_storage_error_message() {
        let err = AppError::Storage("cannot read favorites".to_string());
        assert!(err.to_string().contains("cannot read favorites"));
    }
}
