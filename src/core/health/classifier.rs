//! Scraped Text Classification
//!
//! Maps raw status-page text to a `HealthStatus` using ordered rules.
//! Matching is case-insensitive and the first matching rule wins, so more
//! specific phrases must come before phrases they contain
//! ("no current problems" before "problems").

use crate::core::health::types::{HealthStatus, Rule};

/// Markers that only appear on anti-automation interstitials
///
/// Paths such as `/cdn-cgi/challenge-platform` are left out: Cloudflare injects
/// them into ordinary pages as well.
const CHALLENGE_MARKERS: &[&str] = &[
    "cf-browser-verification",
    "cf-challenge-form",
    "enable javascript and cookies to continue",
    "checking your browser before accessing",
    "ddos protection by cloudflare",
    "attention required! | cloudflare",
    "<title>just a moment...</title>",
    "please verify you are a human",
    "px-captcha",
];

/// Outcome of classifying one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: HealthStatus,
    /// Index of the rule that matched
    pub matched_rule: Option<usize>,
    /// Challenge marker found in the page, if any
    pub challenge_marker: Option<&'static str>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            status: HealthStatus::Unknown,
            matched_rule: None,
            challenge_marker: None,
        }
    }
}

/// Classify `raw_text` with `rules`; `Unknown` if no rule matches
pub fn classify(raw_text: &str, rules: &[Rule]) -> HealthStatus {
    classify_detailed(raw_text, rules).status
}

/// Classify and report which rule matched or which challenge marker was found
///
/// Rules always decide first. Challenge markers are only looked for when no
/// rule matched, to explain why the page said nothing usable.
pub fn classify_detailed(raw_text: &str, rules: &[Rule]) -> Classification {
    let lowered = raw_text.to_lowercase();

    if let Some((index, rule)) = rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.pattern.matches_lowercase(&lowered))
    {
        return Classification {
            status: rule.status,
            matched_rule: Some(index),
            challenge_marker: None,
        };
    }

    Classification {
        challenge_marker: find_challenge_marker(&lowered),
        ..Classification::unknown()
    }
}

/// Detect well-known bot-challenge pages
///
/// # Returns
/// * `Some(marker)` - the first challenge marker found
/// * `None` - no challenge indicators
pub fn detect_challenge_page(raw_text: &str) -> Option<&'static str> {
    find_challenge_marker(&raw_text.to_lowercase())
}

fn find_challenge_marker(lowered: &str) -> Option<&'static str> {
    CHALLENGE_MARKERS
        .iter()
        .copied()
        .find(|marker| lowered.contains(marker))
}
