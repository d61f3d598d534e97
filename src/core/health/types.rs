// Core types for dependency health checks
use chrono::{DateTime, Local};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Health status of one monitored dependency
///
/// There is no severity order between variants. `Unknown` means the check
/// could not decide, it is not a milder form of `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Status page reports no problems, or the probe resource loaded
    Healthy,
    /// Status page reports possible or partial problems
    Warning,
    /// Status page reports an outage
    Critical,
    /// Scrape was inconclusive and the probe resource failed to load
    Unreachable,
    /// Nothing could be determined
    #[default]
    Unknown,
    /// A check is in flight
    Loading,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
            HealthStatus::Unreachable => "unreachable",
            HealthStatus::Unknown => "unknown",
            HealthStatus::Loading => "loading",
        }
    }

    /// Statuses a scrape can decide on its own
    pub fn is_conclusive(&self) -> bool {
        matches!(
            self,
            HealthStatus::Healthy | HealthStatus::Warning | HealthStatus::Critical
        )
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a relay expects the target URL to be passed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RelayRequestMode {
    /// `{base}?{encoded target}` (corsproxy.io style)
    QueryString,
    /// `{base}?{name}={encoded target}` (allorigins style)
    QueryParam { name: String },
    /// `{base}{encoded target}`
    PathSuffix,
}

/// How the relay wraps the fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RelayResponseMode {
    /// Body is the page text itself
    PlainText,
    /// Body is a JSON object holding the page text under `field`
    JsonField { field: String },
}

/// A third-party content relay used to read pages the client cannot fetch directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayDescriptor {
    pub id: String,
    pub base: String,
    pub request: RelayRequestMode,
    pub response: RelayResponseMode,
}

impl RelayDescriptor {
    pub fn new(
        id: impl Into<String>,
        base: impl Into<String>,
        request: RelayRequestMode,
        response: RelayResponseMode,
    ) -> Self {
        Self {
            id: id.into(),
            base: base.into(),
            request,
            response,
        }
    }
}

/// Text pattern of a classification rule
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Case-insensitive substring
    Contains(String),
    /// Matches when any of the case-insensitive substrings is present
    AnyOf(Vec<String>),
    /// Case-insensitive regular expression
    Regex(Regex),
}

impl Pattern {
    /// Match against text that is already lowercased
    pub fn matches_lowercase(&self, lowered: &str) -> bool {
        match self {
            Pattern::Contains(needle) => lowered.contains(&needle.to_lowercase()),
            Pattern::AnyOf(needles) => needles
                .iter()
                .any(|needle| lowered.contains(&needle.to_lowercase())),
            Pattern::Regex(regex) => regex.is_match(lowered),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Pattern::Contains(needle) => format!("\"{}\"", needle),
            Pattern::AnyOf(needles) => needles
                .iter()
                .map(|n| format!("\"{}\"", n))
                .collect::<Vec<_>>()
                .join(" or "),
            Pattern::Regex(regex) => format!("/{}/", regex.as_str()),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Contains(a), Pattern::Contains(b)) => a == b,
            (Pattern::AnyOf(a), Pattern::AnyOf(b)) => a == b,
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// One ordered classification rule; the first matching rule wins
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub pattern: Pattern,
    pub status: HealthStatus,
}

impl Rule {
    pub fn contains(text: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            pattern: Pattern::Contains(text.into()),
            status,
        }
    }

    pub fn any_of<I, S>(texts: I, status: HealthStatus) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: Pattern::AnyOf(texts.into_iter().map(Into::into).collect()),
            status,
        }
    }

    pub fn regex(expr: &str, status: HealthStatus) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(expr).case_insensitive(true).build()?;
        Ok(Self {
            pattern: Pattern::Regex(regex),
            status,
        })
    }
}

/// A monitored dependency and everything needed to check it
#[derive(Debug, Clone, PartialEq)]
pub struct CheckTarget {
    pub id: String,
    pub name: String,
    /// Page a human opens for details
    pub details_url: Option<String>,
    /// Page scraped for a status signal
    pub scrape_url: Option<String>,
    /// Relays tried in order when scraping
    pub relays: Vec<RelayDescriptor>,
    pub rules: Vec<Rule>,
    /// Opaque resource loaded when scraping is inconclusive
    pub probe_url: Option<String>,
    /// Statuspage component group whose children decide the status
    pub component_group: Option<String>,
}

impl CheckTarget {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            details_url: None,
            scrape_url: None,
            relays: Vec::new(),
            rules: Vec::new(),
            probe_url: None,
            component_group: None,
        }
    }

    pub fn with_details(mut self, url: impl Into<String>) -> Self {
        self.details_url = Some(url.into());
        self
    }

    pub fn with_scrape(mut self, url: impl Into<String>, relays: Vec<RelayDescriptor>) -> Self {
        self.scrape_url = Some(url.into());
        self.relays = relays;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_probe(mut self, url: impl Into<String>) -> Self {
        self.probe_url = Some(url.into());
        self
    }

    pub fn with_component_group(mut self, group: impl Into<String>) -> Self {
        self.component_group = Some(group.into());
        self
    }

    /// Whether any determination is possible at all
    pub fn is_checkable(&self) -> bool {
        self.scrape_url.is_some() || self.probe_url.is_some()
    }
}

/// Phases of a single check invocation, recorded in the order visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPhase {
    Idle,
    Scraping,
    Classified,
    Inconclusive,
    Probing,
    Resolved,
}

/// Which path produced the final status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// A text rule matched the scraped page
    Classified,
    /// Component group extracted from the scraped page
    Components,
    /// Probe resource loaded
    ProbeReachable,
    /// Probe resource failed or timed out
    ProbeUnreachable,
    /// Scrape inconclusive and no probe configured
    Inconclusive,
    /// Target had neither scrape nor probe URL
    NotConfigured,
}

/// Status of one child component on a statuspage-style page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    /// Status text exactly as shown on the page
    pub status_text: String,
    pub status: HealthStatus,
}

/// Outcome of one orchestrated check; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub target_id: String,
    pub status: HealthStatus,
    /// Bounded diagnostic text for humans, not for parsing
    pub trace: String,
    pub timestamp: DateTime<Local>,
    pub resolution: Resolution,
    pub phases: Vec<CheckPhase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentStatus>,
}
