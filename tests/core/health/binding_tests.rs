use crate::common::{LoadBehavior, MockFetchClient, MockResourceLoader};
use chrono::Local;
use statusprobe::core::health::{
    CheckOptions, CheckResult, CheckTarget, HealthCheckOrchestrator, HealthStatus, Resolution,
    StatusBoard, StatusView,
};
use std::sync::Arc;
use std::time::Duration;

const TILE: &str = "https://ecn.t0.tiles.virtualearth.net/tiles/r0.jpeg?g=1&mkt=en-US";

fn tile_target() -> CheckTarget {
    CheckTarget::new("bing-maps", "Bing Maps").with_probe(TILE)
}

fn result_with(status: HealthStatus) -> CheckResult {
    CheckResult {
        target_id: "bing-maps".to_string(),
        status,
        trace: String::new(),
        timestamp: Local::now(),
        resolution: Resolution::Classified,
        phases: Vec::new(),
        components: Vec::new(),
    }
}

fn probe_orchestrator(behavior: LoadBehavior) -> HealthCheckOrchestrator {
    HealthCheckOrchestrator::from_clients(
        Arc::new(MockFetchClient::default()),
        Arc::new(MockResourceLoader::new(behavior)),
        &CheckOptions::default(),
    )
}

#[test]
fn test_initial_state_is_unknown() {
    let view = StatusView::new(tile_target());
    let state = view.snapshot();
    assert_eq!(state.status, HealthStatus::Unknown);
    assert!(state.result.is_none());
    assert_eq!(view.latest_ticket(), 0);
}

#[test]
fn test_refresh_shows_loading_until_complete() {
    let view = StatusView::new(tile_target());
    let ticket = view.begin_refresh();
    assert_eq!(view.status(), HealthStatus::Loading);

    assert!(view.complete(ticket, result_with(HealthStatus::Healthy)));
    assert_eq!(view.status(), HealthStatus::Healthy);
    assert_eq!(view.snapshot().applied_ticket, ticket.id());
}

#[test]
fn test_stale_result_discarded() {
    let view = StatusView::new(tile_target());
    let first = view.begin_refresh();
    let second = view.begin_refresh();
    assert!(second > first);

    assert!(view.complete(second, result_with(HealthStatus::Critical)));
    assert!(!view.complete(first, result_with(HealthStatus::Healthy)));

    let state = view.snapshot();
    assert_eq!(state.status, HealthStatus::Critical);
    assert_eq!(state.applied_ticket, second.id());
}

#[test]
fn test_superseded_result_does_not_clear_loading() {
    let view = StatusView::new(tile_target());
    let first = view.begin_refresh();
    let _second = view.begin_refresh();

    assert!(!view.complete(first, result_with(HealthStatus::Healthy)));
    assert_eq!(view.status(), HealthStatus::Loading);
}

#[tokio::test]
async fn test_slow_earlier_check_cannot_overwrite_newer() {
    let view = StatusView::new(tile_target());
    let slow = probe_orchestrator(LoadBehavior::LoadsAfter(Duration::from_millis(100)));
    let fast = probe_orchestrator(LoadBehavior::Fails("HTTP 404".to_string()));

    let (slow_applied, fast_applied) = tokio::join!(view.refresh(&slow), view.refresh(&fast));

    assert!(!slow_applied);
    assert!(fast_applied);
    assert_eq!(view.status(), HealthStatus::Unreachable);
}

#[tokio::test]
async fn test_board_mount_refreshes_every_view() {
    let targets = vec![
        tile_target(),
        CheckTarget::new("google-maps", "Google Maps")
            .with_probe("https://mt0.google.com/vt/lyrs=m&hl=en&x=0&y=0&z=0"),
    ];
    let board = StatusBoard::new(targets);
    let orchestrator = probe_orchestrator(LoadBehavior::Loads);

    board.mount(&orchestrator).await;

    assert_eq!(board.views().len(), 2);
    for view in board.views() {
        assert_eq!(view.status(), HealthStatus::Healthy);
        assert_eq!(view.latest_ticket(), 1);
    }
}

#[tokio::test]
async fn test_board_refresh_by_id() {
    let board = StatusBoard::new(vec![tile_target()]);
    let orchestrator = probe_orchestrator(LoadBehavior::Loads);

    assert!(board.refresh("bing-maps", &orchestrator).await);
    assert!(!board.refresh("missing", &orchestrator).await);
    assert_eq!(board.view("bing-maps").map(|v| v.latest_ticket()), Some(1));
}
