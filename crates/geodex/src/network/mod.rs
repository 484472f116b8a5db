//! Network operations
//!
//! HTTP client and retry utilities.

pub mod client;
pub mod retry;

// Re-export commonly used types
pub use client::HttpClient;
pub use retry::{retry_with_backoff, RetryPolicy};
