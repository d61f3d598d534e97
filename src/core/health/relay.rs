//! Content Relay Fetching
//!
//! Reads the text of an external page through an ordered list of relays:
//! - Per-relay request construction (query string, query parameter, path suffix)
//! - Per-relay response unwrapping (plain text or JSON envelope field)
//! - Single attempt per relay, first non-empty body wins

use crate::core::health::client::FetchClient;
use crate::core::health::types::{RelayDescriptor, RelayRequestMode, RelayResponseMode};
use serde_json::Value;
use std::sync::Arc;
use url::{form_urlencoded, Url};

/// Default upper bound for one relay attempt
pub const DEFAULT_RELAY_TIMEOUT_MS: u32 = 15_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelayError {
    #[error("No relays configured")]
    NoRelaysConfigured,
    #[error("Invalid target URL: {0}")]
    InvalidTargetUrl(String),
    #[error("Relay {relay} failed: {reason}")]
    RelayRequestFailed { relay: String, reason: String },
    #[error("All {attempts} relays exhausted, last error: {last}")]
    AllRelaysExhausted { attempts: usize, last: Box<RelayError> },
}

/// Validate that a target is an absolute http(s) URL
fn validate_target_url(target_url: &str) -> Result<Url, RelayError> {
    let url = Url::parse(target_url)
        .map_err(|e| RelayError::InvalidTargetUrl(format!("{}: {}", target_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::InvalidTargetUrl(format!(
            "{}: unsupported scheme {}",
            target_url, other
        ))),
    }
}

/// Percent-encode a target for use as a single URL component
///
/// Unlike `encodeURIComponent` this also escapes `!'()~`, which relays accept.
/// Spaces become `%20` because `+` is only a space inside form-encoded queries.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build the request URL for one relay
///
/// # Examples
/// - `QueryString`, base `https://corsproxy.io/` →
///   `https://corsproxy.io/?https%3A%2F%2Fexample.com%2F`
/// - `QueryParam { name: "url" }`, base `https://api.allorigins.win/get` →
///   `https://api.allorigins.win/get?url=https%3A%2F%2Fexample.com%2F`
/// - `PathSuffix`, base `https://relay.example/raw/` →
///   `https://relay.example/raw/https%3A%2F%2Fexample.com%2F`
pub fn build_relay_url(relay: &RelayDescriptor, target_url: &str) -> Result<String, RelayError> {
    let encoded = encode_component(target_url);
    let url = match &relay.request {
        RelayRequestMode::QueryString => format!("{}?{}", relay.base, encoded),
        RelayRequestMode::QueryParam { name } => {
            let mut url = Url::parse(&relay.base).map_err(|e| RelayError::RelayRequestFailed {
                relay: relay.id.clone(),
                reason: format!("invalid relay base {}: {}", relay.base, e),
            })?;
            url.query_pairs_mut().append_pair(name, target_url);
            url.to_string()
        }
        RelayRequestMode::PathSuffix => format!("{}{}", relay.base, encoded),
    };
    Ok(url)
}

/// Extract the page text from a relay response body
///
/// Returns `None` when the body cannot be unwrapped or the text is blank.
pub fn unwrap_relay_body(relay: &RelayDescriptor, body: &[u8]) -> Option<String> {
    let text = match &relay.response {
        RelayResponseMode::PlainText => String::from_utf8_lossy(body).into_owned(),
        RelayResponseMode::JsonField { field } => {
            let json: Value = serde_json::from_slice(body).ok()?;
            json.as_object()?.get(field)?.as_str()?.to_string()
        }
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Relay client: tries each relay once, in order
#[derive(Clone)]
pub struct RelayClient {
    client: Arc<dyn FetchClient>,
    timeout_ms: u32,
}

impl RelayClient {
    pub fn new(client: Arc<dyn FetchClient>) -> Self {
        Self {
            client,
            timeout_ms: DEFAULT_RELAY_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Fetch the text content of `target_url` through `relays`
    ///
    /// # Returns
    /// * `Ok(String)` - first non-empty unwrapped body
    /// * `Err(RelayError::NoRelaysConfigured)` - `relays` is empty
    /// * `Err(RelayError::InvalidTargetUrl)` - not an absolute http(s) URL
    /// * `Err(RelayError::AllRelaysExhausted)` - every relay failed
    pub async fn fetch_through_relays(
        &self,
        target_url: &str,
        relays: &[RelayDescriptor],
    ) -> Result<String, RelayError> {
        self.fetch_with_observer(target_url, relays, |_, _| {}).await
    }

    /// Same as `fetch_through_relays`, reporting each attempt to `observe`
    ///
    /// `observe` gets the relay and `None` on success or `Some(error)` on failure.
    pub async fn fetch_with_observer<F>(
        &self,
        target_url: &str,
        relays: &[RelayDescriptor],
        mut observe: F,
    ) -> Result<String, RelayError>
    where
        F: FnMut(&RelayDescriptor, Option<&RelayError>),
    {
        if relays.is_empty() {
            return Err(RelayError::NoRelaysConfigured);
        }
        validate_target_url(target_url)?;

        let mut last_error = None;
        for relay in relays {
            match self.attempt(relay, target_url).await {
                Ok(text) => {
                    observe(relay, None);
                    return Ok(text);
                }
                Err(e) => {
                    observe(relay, Some(&e));
                    last_error = Some(e);
                }
            }
        }

        Err(RelayError::AllRelaysExhausted {
            attempts: relays.len(),
            last: Box::new(last_error.unwrap_or(RelayError::NoRelaysConfigured)),
        })
    }

    async fn attempt(&self, relay: &RelayDescriptor, target_url: &str) -> Result<String, RelayError> {
        let failed = |reason: String| RelayError::RelayRequestFailed {
            relay: relay.id.clone(),
            reason,
        };

        let request_url = build_relay_url(relay, target_url)?;
        let response = self
            .client
            .get(request_url, self.timeout_ms)
            .await
            .map_err(failed)?;

        if !response.is_success() {
            return Err(failed(format!("HTTP {}", response.status_code)));
        }

        unwrap_relay_body(relay, &response.body).ok_or_else(|| failed("empty response".to_string()))
    }
}
