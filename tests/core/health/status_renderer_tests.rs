use chrono::{Local, TimeZone};
use statusprobe::core::health::{
    CheckResult, CheckTarget, ComponentStatus, HealthStatus, Resolution, StatusColor,
    StatusRenderer,
};

fn result(status: HealthStatus, trace: &str) -> CheckResult {
    CheckResult {
        target_id: "bing-maps".to_string(),
        status,
        trace: trace.to_string(),
        timestamp: Local.with_ymd_and_hms(2024, 3, 1, 14, 2, 11).unwrap(),
        resolution: Resolution::Classified,
        phases: Vec::new(),
        components: Vec::new(),
    }
}

fn target() -> CheckTarget {
    CheckTarget::new("bing-maps", "Bing Maps")
        .with_details("https://www.isitdownrightnow.com/maps.bing.com.html")
}

#[test]
fn test_visual_states() {
    let renderer = StatusRenderer::new();

    let healthy = renderer.visual_state(HealthStatus::Healthy);
    assert_eq!(healthy.color, StatusColor::Green);
    assert_eq!(healthy.emoji, "🟢");
    assert!(!healthy.show_trace);

    assert_eq!(renderer.visual_state(HealthStatus::Warning).color, StatusColor::Yellow);
    assert_eq!(renderer.visual_state(HealthStatus::Critical).color, StatusColor::Red);
    assert_eq!(renderer.visual_state(HealthStatus::Loading).label, "Checking...");
}

#[test]
fn test_unreachable_and_unknown_offer_trace() {
    let renderer = StatusRenderer::new();
    for status in [HealthStatus::Unreachable, HealthStatus::Unknown] {
        let visual = renderer.visual_state(status);
        assert!(visual.show_trace, "{} should offer the trace", status);
        assert_ne!(visual.color, StatusColor::Green);
    }
    assert_ne!(
        renderer.visual_state(HealthStatus::Unreachable).label,
        renderer.visual_state(HealthStatus::Unknown).label
    );
}

#[test]
fn test_render_healthy_line() {
    let line = StatusRenderer::new().render_line(
        &target(),
        &result(HealthStatus::Healthy, "Scraped: up"),
        false,
    );
    assert_eq!(line, "🟢 Bing Maps: Healthy (14:02:11)");
}

#[test]
fn test_render_unknown_includes_trace_and_details() {
    let line = StatusRenderer::new().render_line(
        &target(),
        &result(HealthStatus::Unknown, "Scrape failed: dns error"),
        false,
    );
    assert_eq!(
        line,
        "⚪ Bing Maps: Unknown (14:02:11)\n    trace: Scrape failed: dns error\n    details: https://www.isitdownrightnow.com/maps.bing.com.html"
    );
}

#[test]
fn test_render_forced_trace() {
    let line = StatusRenderer::new().render_line(
        &CheckTarget::new("bing-maps", "Bing Maps"),
        &result(HealthStatus::Healthy, "Direct probe succeeded"),
        true,
    );
    assert!(line.ends_with("\n    trace: Direct probe succeeded"));
}

#[test]
fn test_render_components() {
    let mut result = result(HealthStatus::Warning, "");
    result.components = vec![ComponentStatus {
        name: "Chicago, IL, United States - (ORD)".to_string(),
        status_text: "Under Maintenance".to_string(),
        status: HealthStatus::Warning,
    }];

    let line = StatusRenderer::new().render_line(
        &CheckTarget::new("cloudflare-na", "Cloudflare North America"),
        &result,
        false,
    );
    assert_eq!(
        line,
        "🟡 Cloudflare North America: Warning (14:02:11)\n    🟡 Chicago, IL, United States - (ORD) - Under Maintenance"
    );
}
