use crate::common::{LoadBehavior, MockResourceLoader};
use chrono::{Local, TimeZone};
use statusprobe::core::health::{DirectProbe, FixedClock, ProbeError, ProbeOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TILE: &str = "https://mt0.google.com/vt/lyrs=m&hl=en&x=0&y=0&z=0";

#[tokio::test]
async fn test_probe_loaded() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Loads));
    let probe = DirectProbe::new(loader.clone());

    assert!(probe.probe(TILE).await);
    assert_eq!(loader.load_count(), 1);
}

#[tokio::test]
async fn test_probe_load_error() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Fails(
        "HTTP 503".to_string(),
    )));
    let probe = DirectProbe::new(loader);

    assert_eq!(
        probe.probe_outcome(TILE).await,
        ProbeOutcome::Failed(ProbeError::LoadError("HTTP 503".to_string()))
    );
}

#[tokio::test]
async fn test_probe_times_out_when_load_never_settles() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Hangs));
    let probe = DirectProbe::new(loader).with_timeout_ms(50);

    let started = Instant::now();
    let outcome = probe.probe_outcome(TILE).await;

    assert_eq!(outcome, ProbeOutcome::Failed(ProbeError::Timeout(50)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_slow_load_past_timeout_is_unreachable() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::LoadsAfter(
        Duration::from_millis(500),
    )));
    let probe = DirectProbe::new(loader).with_timeout_ms(20);

    assert!(!probe.probe(TILE).await);
}

#[tokio::test]
async fn test_probe_appends_cache_buster() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Loads));
    let now = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let probe = DirectProbe::new(loader.clone()).with_clock(Arc::new(FixedClock(now)));

    assert!(probe.probe(TILE).await);
    assert_eq!(
        loader.urls(),
        vec!["https://mt0.google.com/vt/lyrs=m&hl=en&x=0&y=0&z=0?_t=1700000000000".to_string()]
    );
}

#[tokio::test]
async fn test_invalid_probe_url_never_loads() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Loads));
    let probe = DirectProbe::new(loader.clone());

    assert!(matches!(
        probe.probe_outcome("tiles/0.png").await,
        ProbeOutcome::Failed(ProbeError::InvalidUrl(_))
    ));
    assert_eq!(loader.load_count(), 0);
}

#[test]
fn test_default_timeout() {
    let loader = Arc::new(MockResourceLoader::new(LoadBehavior::Loads));
    assert_eq!(DirectProbe::new(loader).timeout_ms(), 8_000);
}
