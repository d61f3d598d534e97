// Built-in relays and dependency catalog, used when no config file exists

use super::types::{Config, RuleConfig, TargetConfig};
use crate::core::health::{
    CheckOptions, HealthStatus, RelayDescriptor, RelayRequestMode, RelayResponseMode,
};

pub const ALLORIGINS_RELAY: &str = "allorigins";
pub const CORSPROXY_RELAY: &str = "corsproxy";

impl Default for Config {
    fn default() -> Self {
        let options = CheckOptions::default();
        Config {
            relay_timeout_ms: options.relay_timeout_ms,
            probe_timeout_ms: options.probe_timeout_ms,
            trace_excerpt_chars: options.excerpt_chars,
            relays: default_relays(),
            targets: default_targets(),
        }
    }
}

pub fn default_relays() -> Vec<RelayDescriptor> {
    vec![
        RelayDescriptor::new(
            ALLORIGINS_RELAY,
            "https://api.allorigins.win/get",
            RelayRequestMode::QueryParam {
                name: "url".to_string(),
            },
            RelayResponseMode::JsonField {
                field: "contents".to_string(),
            },
        ),
        RelayDescriptor::new(
            CORSPROXY_RELAY,
            "https://corsproxy.io/",
            RelayRequestMode::QueryString,
            RelayResponseMode::PlainText,
        ),
    ]
}

pub fn default_targets() -> Vec<TargetConfig> {
    vec![bing_maps(), google_maps(), cloudflare_north_america()]
}

fn bing_maps() -> TargetConfig {
    let status_page = "https://www.isitdownrightnow.com/maps.bing.com.html";
    TargetConfig {
        id: "bing-maps".to_string(),
        name: "Bing Maps".to_string(),
        details_url: Some(status_page.to_string()),
        scrape_url: Some(status_page.to_string()),
        relays: vec![ALLORIGINS_RELAY.to_string(), CORSPROXY_RELAY.to_string()],
        component_group: None,
        probe_url: Some("https://ecn.t0.tiles.virtualearth.net/tiles/r0.jpeg?g=1&mkt=en-US".to_string()),
        rules: vec![
            RuleConfig::any_of(
                &["class=\"status_up\"", "class='status_up'"],
                HealthStatus::Healthy,
            ),
            RuleConfig::any_of(
                &["class=\"status_down\"", "class='status_down'"],
                HealthStatus::Critical,
            ),
            RuleConfig::contains("is down for everyone", HealthStatus::Critical),
            RuleConfig::any_of(&["is up and reachable", "reachable by us"], HealthStatus::Healthy),
        ],
    }
}

fn google_maps() -> TargetConfig {
    let status_page = "https://downdetector.com/status/google-maps/";
    TargetConfig {
        id: "google-maps".to_string(),
        name: "Google Maps".to_string(),
        details_url: Some(status_page.to_string()),
        scrape_url: Some(status_page.to_string()),
        relays: vec![CORSPROXY_RELAY.to_string()],
        component_group: None,
        probe_url: Some("https://mt0.google.com/vt/lyrs=m&hl=en&x=0&y=0&z=0".to_string()),
        rules: vec![
            RuleConfig::contains("user reports indicate no current problems", HealthStatus::Healthy),
            RuleConfig::contains("user reports indicate possible problems", HealthStatus::Warning),
            RuleConfig::contains("user reports indicate problems", HealthStatus::Critical),
        ],
    }
}

fn cloudflare_north_america() -> TargetConfig {
    let status_page = "https://www.cloudflarestatus.com/";
    TargetConfig {
        id: "cloudflare-na".to_string(),
        name: "Cloudflare North America".to_string(),
        details_url: Some(status_page.to_string()),
        scrape_url: Some(status_page.to_string()),
        relays: vec![CORSPROXY_RELAY.to_string(), ALLORIGINS_RELAY.to_string()],
        component_group: Some("North America".to_string()),
        probe_url: None,
        rules: vec![RuleConfig::contains(
            "all systems operational",
            HealthStatus::Healthy,
        )],
    }
}
