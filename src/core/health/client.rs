//! HTTP Client Seams for Health Checks
//!
//! Two narrow abstractions sit between the engine and the network:
//! - `FetchClient` reads a relay response (status + body)
//! - `ResourceLoader` performs an opaque resource load for the direct probe
//!
//! Both return `Err(String)` for transport failures so callers can fold the
//! message straight into a diagnostic trace.

use std::time::Duration;

#[cfg(feature = "network-monitoring")]
use isahc::config::{Configurable, RedirectPolicy};
#[cfg(feature = "network-monitoring")]
use isahc::{AsyncReadResponseExt, HttpClient, Request};
#[cfg(feature = "network-monitoring")]
use std::time::Instant;

#[cfg(feature = "network-monitoring")]
const USER_AGENT: &str = concat!("statusprobe/", env!("CARGO_PKG_VERSION"));

/// Relay response with the raw body kept for unwrapping
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code returned by the relay
    pub status_code: u16,
    /// Raw response body
    pub body: Vec<u8>,
    /// Request duration
    pub duration: Duration,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP GET used for relay requests
#[async_trait::async_trait]
pub trait FetchClient: Send + Sync {
    /// Execute one GET request, following redirects
    ///
    /// # Returns
    /// * `Ok(FetchResponse)` - any HTTP response, including non-2xx
    /// * `Err(String)` - transport failure or timeout
    async fn get(&self, url: String, timeout_ms: u32) -> Result<FetchResponse, String>;
}

/// Opaque resource load used by the direct probe
///
/// Implementations need not enforce a timeout; the probe races every load
/// against its own.
#[async_trait::async_trait]
pub trait ResourceLoader: Send + Sync {
    /// `Ok(())` when the resource loaded, `Err` with a reason otherwise
    async fn load(&self, url: String) -> Result<(), String>;
}

/// Production relay client using isahc
#[cfg(feature = "network-monitoring")]
pub struct IsahcFetchClient {
    client: HttpClient,
}

#[cfg(feature = "network-monitoring")]
#[async_trait::async_trait]
impl FetchClient for IsahcFetchClient {
    async fn get(&self, url: String, timeout_ms: u32) -> Result<FetchResponse, String> {
        let start = Instant::now();

        let request = Request::get(&url)
            .timeout(Duration::from_millis(timeout_ms as u64))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html,application/json;q=0.9,*/*;q=0.8")
            .body(Vec::new())
            .map_err(|e| format!("Relay request creation failed: {}", e))?;

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| format!("Relay request failed: {}", e))?;

        let status_code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read relay response body: {}", e))?
            .to_vec();

        Ok(FetchResponse {
            status_code,
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(feature = "network-monitoring")]
impl IsahcFetchClient {
    pub fn new() -> Result<Self, String> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(5))
            .build()
            .map_err(|e| format!("Failed to create relay client: {}", e))?;
        Ok(Self { client })
    }
}

/// Production probe loader using isahc
///
/// A resource counts as loaded when the server answers 2xx with a non-empty
/// body, which is what an image element needs before it fires `load`.
#[cfg(feature = "network-monitoring")]
pub struct IsahcResourceLoader {
    client: HttpClient,
}

#[cfg(feature = "network-monitoring")]
#[async_trait::async_trait]
impl ResourceLoader for IsahcResourceLoader {
    async fn load(&self, url: String) -> Result<(), String> {
        let request = Request::get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "image/*,*/*;q=0.8")
            .body(Vec::new())
            .map_err(|e| format!("Probe request creation failed: {}", e))?;

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| format!("Probe request failed: {}", e))?;

        let status_code = response.status().as_u16();
        if !(200..300).contains(&status_code) {
            return Err(format!("HTTP {}", status_code));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read probe resource: {}", e))?;
        if body.is_empty() {
            return Err("empty resource".to_string());
        }
        Ok(())
    }
}

#[cfg(feature = "network-monitoring")]
impl IsahcResourceLoader {
    pub fn new() -> Result<Self, String> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(5))
            .build()
            .map_err(|e| format!("Failed to create probe client: {}", e))?;
        Ok(Self { client })
    }
}

/// Stand-in relay client when network-monitoring is disabled
#[cfg(not(feature = "network-monitoring"))]
#[derive(Default)]
pub struct MockFetchClient;

#[cfg(not(feature = "network-monitoring"))]
#[async_trait::async_trait]
impl FetchClient for MockFetchClient {
    async fn get(&self, _url: String, _timeout_ms: u32) -> Result<FetchResponse, String> {
        Err("network monitoring disabled at build time".to_string())
    }
}

/// Stand-in probe loader when network-monitoring is disabled
#[cfg(not(feature = "network-monitoring"))]
#[derive(Default)]
pub struct MockResourceLoader;

#[cfg(not(feature = "network-monitoring"))]
#[async_trait::async_trait]
impl ResourceLoader for MockResourceLoader {
    async fn load(&self, _url: String) -> Result<(), String> {
        Err("network monitoring disabled at build time".to_string())
    }
}
