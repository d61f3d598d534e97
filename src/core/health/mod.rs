//! Dependency Health Check Engine
//!
//! Decides whether an external dependency is healthy, degraded, down or
//! unreachable:
//! - Status page scraping through interchangeable content relays
//! - Ordered, case-insensitive text rules (first match wins)
//! - Statuspage component group extraction
//! - Direct reachability probe with a bounded timeout as fallback
//! - Generation-guarded views so a slow stale check never overwrites a newer one

pub mod binding;
pub mod classifier;
pub mod client;
pub mod clock;
pub mod components;
pub mod config;
pub mod orchestrator;
pub mod probe;
pub mod relay;
pub mod status_renderer;
pub mod trace;
pub mod types;

// Re-export public API
pub use binding::{RefreshTicket, StatusBoard, StatusView, ViewState};
pub use classifier::{classify, classify_detailed, detect_challenge_page, Classification};
pub use client::{FetchClient, FetchResponse, ResourceLoader};
pub use clock::{ClockTrait, FixedClock, SystemClock};
pub use components::{component_level, extract_component_group, rollup, ComponentError};
pub use config::CheckOptions;
pub use orchestrator::HealthCheckOrchestrator;
pub use probe::{cache_busted_url, DirectProbe, ProbeError, ProbeOutcome};
pub use relay::{build_relay_url, unwrap_relay_body, RelayClient, RelayError};
pub use status_renderer::{StatusColor, StatusRenderer, VisualState};
pub use types::*;

// Re-export client implementations conditionally
#[cfg(feature = "network-monitoring")]
pub use client::{IsahcFetchClient, IsahcResourceLoader};

#[cfg(not(feature = "network-monitoring"))]
pub use client::{MockFetchClient, MockResourceLoader};
