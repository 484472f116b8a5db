//! Shared HTTP client wrapper
//!
//! Thin wrapper around `reqwest::blocking::Client` that centralizes
//! USER_AGENT, timeouts and the retry loop.

use crate::config::network::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::error::{AppError, Result};
use crate::network::retry::{retry_with_backoff, RetryPolicy};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Shared HTTP client with standard configuration
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a new client with default geodex settings
    pub fn new() -> Result<Self> {
        let inner = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;
        Ok(Self { inner })
    }

    /// Send a request, retrying transport failures per `policy`
    ///
    /// `build` is called once per attempt, so method, headers and body are
    /// up to the caller. Any response that arrives is returned as-is,
    /// including non-2xx statuses. Only errors raised before a response
    /// exists are retried.
    pub fn send_with_retry<F>(&self, policy: &RetryPolicy, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = retry_with_backoff(policy, std::thread::sleep, |attempt| {
            build(&self.inner).send().inspect_err(|e| {
                let url = e.url().map(|u| u.as_str()).unwrap_or("<unknown>");
                warn!(attempt, url, error = %e, "fetch attempt failed");
            })
        })?;
        Ok(response)
    }

    /// GET a URL, retrying transport failures per `policy`
    pub fn fetch_with_retry(&self, url: &str, policy: &RetryPolicy) -> Result<Response> {
        self.send_with_retry(policy, |client| client.get(url))
    }

    /// GET a URL with retries and deserialize a 2xx JSON response
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, policy: &RetryPolicy) -> Result<T> {
        let resp = self.fetch_with_retry(url, policy)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let data = resp.json::<T>()?;
        Ok(data)
    }
}
