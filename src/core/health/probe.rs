//! Direct Reachability Probe
//!
//! Loads a small public resource (e.g. a map tile) from the target's
//! delivery network. Only load success or failure is observed, the content
//! is never read. Every load is raced against a bounded timeout because the
//! underlying load may never settle on a stalled connection.

use crate::core::health::client::ResourceLoader;
use crate::core::health::clock::{ClockTrait, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default probe timeout
pub const DEFAULT_PROBE_TIMEOUT_MS: u32 = 8_000;

/// Query parameter carrying the cache-busting timestamp
pub const CACHE_BUST_PARAM: &str = "_t";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("timed out after {0}ms")]
    Timeout(u32),
    #[error("load error: {0}")]
    LoadError(String),
    #[error("invalid probe URL: {0}")]
    InvalidUrl(String),
}

/// Result of one probe, with the failure reason kept for the trace
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Loaded,
    Failed(ProbeError),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Loaded)
    }
}

/// Append `_t=<epoch millis>` so repeated probes bypass local caches
pub fn cache_busted_url(resource_url: &str, epoch_millis: i64) -> Result<String, ProbeError> {
    let mut url = Url::parse(resource_url)
        .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", resource_url, e)))?;
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &epoch_millis.to_string());
    Ok(url.to_string())
}

/// Stateless reachability probe; safe to run concurrently for many targets
#[derive(Clone)]
pub struct DirectProbe {
    loader: Arc<dyn ResourceLoader>,
    clock: Arc<dyn ClockTrait>,
    timeout_ms: u32,
}

impl DirectProbe {
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            clock: Arc::new(SystemClock),
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockTrait>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// `true` if the resource loaded within the timeout
    pub async fn probe(&self, resource_url: &str) -> bool {
        self.probe_outcome(resource_url).await.is_reachable()
    }

    /// Probe once and keep the failure reason
    pub async fn probe_outcome(&self, resource_url: &str) -> ProbeOutcome {
        let url = match cache_busted_url(resource_url, self.clock.epoch_millis()) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::Failed(e),
        };

        let limit = Duration::from_millis(self.timeout_ms as u64);
        match tokio::time::timeout(limit, self.loader.load(url)).await {
            Ok(Ok(())) => ProbeOutcome::Loaded,
            Ok(Err(reason)) => ProbeOutcome::Failed(ProbeError::LoadError(reason)),
            Err(_) => ProbeOutcome::Failed(ProbeError::Timeout(self.timeout_ms)),
        }
    }
}
