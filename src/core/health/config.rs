//! Check Tuning Options

use crate::core::health::probe::DEFAULT_PROBE_TIMEOUT_MS;
use crate::core::health::relay::DEFAULT_RELAY_TIMEOUT_MS;
use crate::core::health::trace::DEFAULT_EXCERPT_CHARS;
use serde::{Deserialize, Serialize};

/// Timeouts and trace sizing for one orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Upper bound for each relay attempt
    /// Default: 15000ms
    pub relay_timeout_ms: u32,

    /// Upper bound for the direct probe; the load itself has no timeout
    /// Default: 8000ms
    pub probe_timeout_ms: u32,

    /// Characters of scraped text kept in the trace
    /// Default: 300
    pub excerpt_chars: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            relay_timeout_ms: DEFAULT_RELAY_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl CheckOptions {
    /// Shorter bounds for a quick look during an incident call
    pub fn quick() -> Self {
        Self {
            relay_timeout_ms: 5_000,
            probe_timeout_ms: 4_000,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}
