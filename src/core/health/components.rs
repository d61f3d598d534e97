//! Statuspage Component Extraction
//!
//! Hosted status pages built on the common "statuspage" layout list
//! components in groups:
//!
//! ```text
//! div.component-container
//!   div.component-inner-container > span.name            (group header)
//!   div.child-components-container
//!     div.component-inner-container > span.name, span.component-status
//! ```
//!
//! The extractor finds a group by its header name and returns every child
//! component with its status. It works on the raw markup with plain string
//! scanning; markup changes surface as `ComponentError`, never as a guess.

use crate::core::health::types::{ComponentStatus, HealthStatus};

const GROUP_MARKER: &str = "class=\"component-container";
const CHILDREN_MARKER: &str = "child-components-container";
const ROW_MARKER: &str = "component-inner-container";
const NAME_MARKER: &str = "class=\"name";
const STATUS_MARKER: &str = "class=\"component-status";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("Component group \"{0}\" not found in status page")]
    GroupNotFound(String),
    #[error("No child components listed under \"{0}\"")]
    NoChildComponents(String),
}

/// Extract the child components of the group named `group_name`
pub fn extract_component_group(
    html: &str,
    group_name: &str,
) -> Result<Vec<ComponentStatus>, ComponentError> {
    let wanted = group_name.trim();

    let block = split_on(html, GROUP_MARKER)
        .into_iter()
        .find(|block| {
            first_name(block)
                .map(|name| name.eq_ignore_ascii_case(wanted))
                .unwrap_or(false)
        })
        .ok_or_else(|| ComponentError::GroupNotFound(wanted.to_string()))?;

    let children_start = block
        .find(CHILDREN_MARKER)
        .ok_or_else(|| ComponentError::NoChildComponents(wanted.to_string()))?;

    let components: Vec<ComponentStatus> = split_on(&block[children_start..], ROW_MARKER)
        .into_iter()
        .filter_map(parse_row)
        .collect();

    if components.is_empty() {
        return Err(ComponentError::NoChildComponents(wanted.to_string()));
    }
    Ok(components)
}

/// Map a component status text to a `HealthStatus`
///
/// - "Operational" → Healthy
/// - contains "maintenance" or "degraded" → Warning
/// - contains "outage" → Critical
/// - anything else → Unknown
pub fn component_level(status_text: &str) -> HealthStatus {
    let lowered = status_text.trim().to_lowercase();
    if lowered == "operational" {
        HealthStatus::Healthy
    } else if lowered.contains("outage") {
        HealthStatus::Critical
    } else if lowered.contains("maintenance") || lowered.contains("degraded") {
        HealthStatus::Warning
    } else {
        HealthStatus::Unknown
    }
}

/// Derive one status for a group of components
///
/// Any critical component makes the group critical, then any warning makes
/// it a warning; healthy needs every component healthy.
pub fn rollup(components: &[ComponentStatus]) -> HealthStatus {
    if components.is_empty() {
        return HealthStatus::Unknown;
    }
    if components.iter().any(|c| c.status == HealthStatus::Critical) {
        HealthStatus::Critical
    } else if components.iter().any(|c| c.status == HealthStatus::Warning) {
        HealthStatus::Warning
    } else if components.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unknown
    }
}

/// Split `html` into pieces that each start at an occurrence of `marker`
///
/// Text before the first occurrence is dropped.
fn split_on<'a>(html: &'a str, marker: &str) -> Vec<&'a str> {
    let starts: Vec<usize> = html.match_indices(marker).map(|(i, _)| i).collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(html.len());
            &html[start..end]
        })
        .collect()
}

fn first_name(block: &str) -> Option<String> {
    let (name, _) = marked_element_text(block, NAME_MARKER)?;
    Some(name)
}

fn parse_row(row: &str) -> Option<ComponentStatus> {
    let (name, after_name) = marked_element_text(row, NAME_MARKER)?;
    if name.is_empty() {
        return None;
    }
    let (status_text, _) = marked_element_text(&row[after_name..], STATUS_MARKER)
        .unwrap_or_else(|| ("Unknown".to_string(), 0));
    let status = component_level(&status_text);
    Some(ComponentStatus {
        name,
        status_text,
        status,
    })
}

/// Text of the span whose opening tag contains `marker`, and the offset after it
fn marked_element_text(html: &str, marker: &str) -> Option<(String, usize)> {
    let marker_at = html.find(marker)?;
    let open_end = marker_at + html[marker_at..].find('>')? + 1;
    let (inner_end, after) = closing_span(html, open_end)?;
    Some((clean_text(&html[open_end..inner_end]), after))
}

/// Find the `</span>` closing a span whose content starts at `start`,
/// skipping nested spans. Returns (content end, offset after the closing tag).
fn closing_span(html: &str, start: usize) -> Option<(usize, usize)> {
    const OPEN: &str = "<span";
    const CLOSE: &str = "</span>";

    let mut depth = 1usize;
    let mut cursor = start;
    loop {
        let rest = &html[cursor..];
        let close = rest.find(CLOSE)?;
        match rest.find(OPEN) {
            Some(open) if open < close => {
                depth += 1;
                cursor += open + OPEN.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((cursor + close, cursor + close + CLOSE.len()));
                }
                cursor += close + CLOSE.len();
            }
        }
    }
}

/// Drop tags, decode the common entities and collapse whitespace
fn clean_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
