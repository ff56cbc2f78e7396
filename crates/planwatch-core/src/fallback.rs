//! Fallback fetch over an ordered list of candidate URLs.
//!
//! The backend may be reachable through several equally valid base URLs
//! depending on how it was deployed. [`FallbackRequestClient`] tries each
//! candidate strictly in order and only reports failure once all of them have
//! failed.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{
    error::{AttemptError, AttemptFailure, ClientError, Result},
    transport::{HttpTransport, RawResponse},
};

/// Fetches JSON from the first candidate URL that answers successfully.
#[derive(Clone)]
pub struct FallbackRequestClient {
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl FallbackRequestClient {
    /// Creates a client with no per-request timeout.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Returns a copy of this client that bounds every request by `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            timeout: Some(timeout),
        }
    }

    /// Per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Tries each URL in order and returns the parsed body of the first
    /// successful one.
    ///
    /// A later candidate is never requested before an earlier one has
    /// resolved. Empty or whitespace-only bodies parse to `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Exhausted`] carrying one [`AttemptFailure`] per
    /// candidate when none of them succeeds.
    pub async fn fetch_with_fallback<S: AsRef<str>>(&self, urls: &[S]) -> Result<Value> {
        let total = urls.len();
        let mut attempts = Vec::with_capacity(total);

        for (index, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            debug!("Trying candidate {}/{total}: {url}", index + 1);

            match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!("Candidate {}/{total} {url} failed: {error}", index + 1);
                    attempts.push(AttemptFailure {
                        url: url.to_string(),
                        error,
                    });
                }
            }
        }

        Err(ClientError::Exhausted { attempts })
    }

    async fn attempt(&self, url: &str) -> std::result::Result<Value, AttemptError> {
        let response = self.transport.get(url, self.timeout).await?;
        parse_response(response)
    }
}

/// Turns a raw response into JSON, treating an empty body as `{}`.
pub fn parse_response(response: RawResponse) -> std::result::Result<Value, AttemptError> {
    if !response.is_success() {
        return Err(AttemptError::Http {
            status: response.status,
        });
    }

    parse_body(&response.body)
}

/// Parses a response body, mapping an empty or blank body to `{}`.
pub fn parse_body(body: &str) -> std::result::Result<Value, AttemptError> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(body).map_err(|source| {
        debug!("Raw body that failed to parse: {body}");
        AttemptError::InvalidJson { source }
    })
}
