// Visual state rendering for health check results
use crate::core::health::types::{CheckResult, CheckTarget, ComponentStatus, HealthStatus};
use serde::Serialize;

/// Color family of a rendered status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
    Slate,
}

/// Everything a view needs to draw one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualState {
    pub color: StatusColor,
    pub emoji: &'static str,
    pub label: &'static str,
    /// Whether the diagnostic trace panel should be offered
    pub show_trace: bool,
}

/// Renders health statuses for display
pub struct StatusRenderer;

impl StatusRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Map a status to its visual state
    /// Emoji: 🟢/🟡/🔴/🔴/⚪/⏳ map to `healthy/warning/critical/unreachable/unknown/loading`
    /// Unreachable and unknown never share a color with healthy; both offer the trace panel
    pub fn visual_state(&self, status: HealthStatus) -> VisualState {
        match status {
            HealthStatus::Healthy => VisualState {
                color: StatusColor::Green,
                emoji: "🟢",
                label: "Healthy",
                show_trace: false,
            },
            HealthStatus::Warning => VisualState {
                color: StatusColor::Yellow,
                emoji: "🟡",
                label: "Warning",
                show_trace: false,
            },
            HealthStatus::Critical => VisualState {
                color: StatusColor::Red,
                emoji: "🔴",
                label: "Critical",
                show_trace: false,
            },
            HealthStatus::Unreachable => VisualState {
                color: StatusColor::Red,
                emoji: "🔴",
                label: "Unreachable",
                show_trace: true,
            },
            HealthStatus::Unknown => VisualState {
                color: StatusColor::Slate,
                emoji: "⚪",
                label: "Unknown",
                show_trace: true,
            },
            HealthStatus::Loading => VisualState {
                color: StatusColor::Slate,
                emoji: "⏳",
                label: "Checking...",
                show_trace: false,
            },
        }
    }

    /// One line per target, e.g. `🟢 Bing Maps: Healthy (14:02:11)`
    ///
    /// The trace follows on an indented line when the status calls for it,
    /// or always with `always_trace`.
    pub fn render_line(&self, target: &CheckTarget, result: &CheckResult, always_trace: bool) -> String {
        let visual = self.visual_state(result.status);
        let mut line = format!(
            "{} {}: {} ({})",
            visual.emoji,
            target.name,
            visual.label,
            result.timestamp.format("%H:%M:%S")
        );

        for component in &result.components {
            line.push('\n');
            line.push_str(&self.render_component(component));
        }

        if (visual.show_trace || always_trace) && !result.trace.is_empty() {
            line.push_str(&format!("\n    trace: {}", result.trace));
        }
        if let Some(details) = &target.details_url {
            if visual.show_trace || result.status != HealthStatus::Healthy {
                line.push_str(&format!("\n    details: {}", details));
            }
        }
        line
    }

    fn render_component(&self, component: &ComponentStatus) -> String {
        let visual = self.visual_state(component.status);
        format!("    {} {} - {}", visual.emoji, component.name, component.status_text)
    }
}

impl Default for StatusRenderer {
    fn default() -> Self {
        Self::new()
    }
}
