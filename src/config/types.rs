use crate::core::health::{CheckOptions, CheckTarget, HealthStatus, RelayDescriptor, Rule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-relay attempt timeout
    pub relay_timeout_ms: u32,
    /// Direct probe timeout
    pub probe_timeout_ms: u32,
    /// Characters of scraped text kept in the trace
    pub trace_excerpt_chars: usize,
    pub relays: Vec<RelayDescriptor>,
    pub targets: Vec<TargetConfig>,
}

/// One monitored dependency as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_url: Option<String>,
    /// Relay ids, tried in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relays: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// Exactly one of `contains`, `any_of` or `regex` must be set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    pub status: HealthStatus,
}

impl RuleConfig {
    pub fn contains(text: &str, status: HealthStatus) -> Self {
        Self {
            contains: Some(text.to_string()),
            any_of: None,
            regex: None,
            status,
        }
    }

    pub fn any_of(texts: &[&str], status: HealthStatus) -> Self {
        Self {
            contains: None,
            any_of: Some(texts.iter().map(|t| t.to_string()).collect()),
            regex: None,
            status,
        }
    }

    pub fn regex(expr: &str, status: HealthStatus) -> Self {
        Self {
            contains: None,
            any_of: None,
            regex: Some(expr.to_string()),
            status,
        }
    }

    /// Compile into an engine rule
    pub fn to_rule(&self, target: &str, index: usize) -> Result<Rule, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRule {
            target: target.to_string(),
            index: index + 1,
            reason: reason.to_string(),
        };

        if !self.status.is_conclusive() {
            return Err(invalid("status must be healthy, warning or critical"));
        }

        match (&self.contains, &self.any_of, &self.regex) {
            (Some(text), None, None) => {
                if text.trim().is_empty() {
                    return Err(invalid("empty pattern"));
                }
                Ok(Rule::contains(text.clone(), self.status))
            }
            (None, Some(texts), None) => {
                if texts.is_empty() || texts.iter().any(|t| t.trim().is_empty()) {
                    return Err(invalid("any_of needs non-empty patterns"));
                }
                Ok(Rule::any_of(texts.clone(), self.status))
            }
            (None, None, Some(expr)) => {
                Rule::regex(expr, self.status).map_err(|e| ConfigError::InvalidRegex {
                    target: target.to_string(),
                    pattern: expr.clone(),
                    reason: e.to_string(),
                })
            }
            _ => Err(invalid("exactly one of contains, any_of or regex is required")),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Target '{target}' references unknown relay '{relay}'")]
    UnknownRelay { target: String, relay: String },

    #[error("Target '{0}' has a scrape URL but no relays")]
    NoRelaysConfigured(String),

    #[error("Target '{target}' has invalid regex '{pattern}': {reason}")]
    InvalidRegex {
        target: String,
        pattern: String,
        reason: String,
    },

    #[error("Target '{target}' rule {index}: {reason}")]
    InvalidRule {
        target: String,
        index: usize,
        reason: String,
    },

    #[error("Duplicate target id '{0}'")]
    DuplicateTarget(String),

    #[error("Duplicate relay id '{0}'")]
    DuplicateRelay(String),

    #[error("{0} must be greater than 0")]
    InvalidTimeout(&'static str),

    #[error("Target '{0}' has neither a scrape URL nor a probe URL")]
    NoDetermination(String),

    #[error("'{owner}' has invalid URL '{url}'")]
    InvalidUrl { owner: String, url: String },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

fn validate_url(owner: &str, raw: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        owner: owner.to_string(),
        url: raw.to_string(),
    };
    let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(invalid()),
    }
}

impl Config {
    /// Engine options derived from the timeout settings
    pub fn options(&self) -> CheckOptions {
        CheckOptions {
            relay_timeout_ms: self.relay_timeout_ms,
            probe_timeout_ms: self.probe_timeout_ms,
            excerpt_chars: self.trace_excerpt_chars,
        }
    }

    /// Validate and resolve every target into its runtime form
    pub fn resolve_targets(&self) -> Result<Vec<CheckTarget>, ConfigError> {
        // A zero timeout reaches curl as "no timeout at all"
        if self.relay_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("relay_timeout_ms"));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("probe_timeout_ms"));
        }

        let mut relay_ids = HashSet::new();
        for relay in &self.relays {
            if !relay_ids.insert(relay.id.as_str()) {
                return Err(ConfigError::DuplicateRelay(relay.id.clone()));
            }
            validate_url(&relay.id, &relay.base)?;
        }

        let mut target_ids = HashSet::new();
        self.targets
            .iter()
            .map(|target| {
                if !target_ids.insert(target.id.as_str()) {
                    return Err(ConfigError::DuplicateTarget(target.id.clone()));
                }
                self.resolve_target(target)
            })
            .collect()
    }

    fn resolve_target(&self, config: &TargetConfig) -> Result<CheckTarget, ConfigError> {
        let id = config.id.as_str();
        if config.scrape_url.is_none() && config.probe_url.is_none() {
            return Err(ConfigError::NoDetermination(id.to_string()));
        }

        let mut target = CheckTarget::new(id, config.name.clone());

        if let Some(details) = &config.details_url {
            validate_url(id, details)?;
            target = target.with_details(details.clone());
        }

        if let Some(scrape_url) = &config.scrape_url {
            validate_url(id, scrape_url)?;
            if config.relays.is_empty() {
                return Err(ConfigError::NoRelaysConfigured(id.to_string()));
            }
            let relays = config
                .relays
                .iter()
                .map(|relay_id| {
                    self.relays
                        .iter()
                        .find(|relay| &relay.id == relay_id)
                        .cloned()
                        .ok_or_else(|| ConfigError::UnknownRelay {
                            target: id.to_string(),
                            relay: relay_id.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            target = target.with_scrape(scrape_url.clone(), relays);
        }

        for (index, rule) in config.rules.iter().enumerate() {
            target = target.with_rule(rule.to_rule(id, index)?);
        }

        if let Some(probe_url) = &config.probe_url {
            validate_url(id, probe_url)?;
            target = target.with_probe(probe_url.clone());
        }

        if let Some(group) = &config.component_group {
            target = target.with_component_group(group.clone());
        }

        Ok(target)
    }
}
