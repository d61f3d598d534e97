//! Health Check Orchestration
//!
//! Runs the full determination sequence for one target:
//! - Scrape the status page through relays and classify it
//! - Fall back to a direct probe when the scrape is inconclusive
//! - Accumulate a bounded diagnostic trace along the way
//!
//! `run_check` is total: every failure ends up in the trace and pushes the
//! status toward `unknown`/`unreachable`, nothing is returned as an error.

use crate::core::debug_logger::DebugLogger;
use crate::core::health::classifier::classify_detailed;
use crate::core::health::client::{FetchClient, ResourceLoader};
use crate::core::health::clock::{ClockTrait, SystemClock};
use crate::core::health::components::{extract_component_group, rollup};
use crate::core::health::config::CheckOptions;
use crate::core::health::probe::{DirectProbe, ProbeOutcome};
use crate::core::health::relay::RelayClient;
use crate::core::health::trace::TraceBuilder;
use crate::core::health::types::{
    CheckPhase, CheckResult, CheckTarget, ComponentStatus, HealthStatus, Resolution,
};
use std::sync::Arc;
use std::time::Instant;

/// Mutable bookkeeping for one invocation
struct CheckRun {
    phases: Vec<CheckPhase>,
    trace: TraceBuilder,
    components: Vec<ComponentStatus>,
}

impl CheckRun {
    fn new(excerpt_chars: usize) -> Self {
        Self {
            phases: vec![CheckPhase::Idle],
            trace: TraceBuilder::new(excerpt_chars),
            components: Vec::new(),
        }
    }

    fn enter(&mut self, phase: CheckPhase) {
        self.phases.push(phase);
    }
}

pub struct HealthCheckOrchestrator {
    relay: RelayClient,
    probe: DirectProbe,
    clock: Arc<dyn ClockTrait>,
    logger: Arc<DebugLogger>,
    excerpt_chars: usize,
}

impl HealthCheckOrchestrator {
    pub fn new(relay: RelayClient, probe: DirectProbe) -> Self {
        Self {
            relay,
            probe,
            clock: Arc::new(SystemClock),
            logger: Arc::new(DebugLogger::disabled()),
            excerpt_chars: CheckOptions::default().excerpt_chars,
        }
    }

    /// Build from HTTP seams and options
    pub fn from_clients(
        fetch: Arc<dyn FetchClient>,
        loader: Arc<dyn ResourceLoader>,
        options: &CheckOptions,
    ) -> Self {
        let relay = RelayClient::new(fetch).with_timeout_ms(options.relay_timeout_ms);
        let probe = DirectProbe::new(loader).with_timeout_ms(options.probe_timeout_ms);
        Self::new(relay, probe).with_excerpt_chars(options.excerpt_chars)
    }

    /// Production orchestrator backed by isahc
    #[cfg(feature = "network-monitoring")]
    pub fn with_network(options: &CheckOptions) -> Result<Self, String> {
        use crate::core::health::client::{IsahcFetchClient, IsahcResourceLoader};

        Ok(Self::from_clients(
            Arc::new(IsahcFetchClient::new()?),
            Arc::new(IsahcResourceLoader::new()?),
            options,
        ))
    }

    /// Without network-monitoring every check degrades to `unknown`
    #[cfg(not(feature = "network-monitoring"))]
    pub fn with_network(options: &CheckOptions) -> Result<Self, String> {
        use crate::core::health::client::{MockFetchClient, MockResourceLoader};

        Ok(Self::from_clients(
            Arc::new(MockFetchClient),
            Arc::new(MockResourceLoader),
            options,
        ))
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockTrait>) -> Self {
        self.probe = self.probe.with_clock(clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: Arc<DebugLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    pub fn logger(&self) -> &DebugLogger {
        &self.logger
    }

    /// Run one check for `target`
    ///
    /// # Behavior
    /// 1. Scrape through relays and classify (component group first, then rules)
    /// 2. If inconclusive and a probe URL exists, probe: loaded → healthy,
    ///    failed → unreachable
    /// 3. Inconclusive without probe → unknown
    ///
    /// The probe never starts before the scrape path has resolved.
    pub async fn run_check(&self, target: &CheckTarget) -> CheckResult {
        let started = Instant::now();
        let correlation_id = self.logger.new_correlation_id();
        self.logger.check_start(&target.id, &correlation_id);

        let mut run = CheckRun::new(self.excerpt_chars);

        let (status, resolution) = if !target.is_checkable() {
            run.trace.note("No scrape URL or probe URL configured");
            (HealthStatus::Unknown, Resolution::NotConfigured)
        } else {
            let mut decided = None;

            if let Some(scrape_url) = &target.scrape_url {
                run.enter(CheckPhase::Scraping);
                decided = self.scrape(target, scrape_url, &mut run, &correlation_id).await;
                run.enter(if decided.is_some() {
                    CheckPhase::Classified
                } else {
                    CheckPhase::Inconclusive
                });
            }

            match decided {
                Some(decided) => decided,
                None => match &target.probe_url {
                    Some(probe_url) => {
                        run.enter(CheckPhase::Probing);
                        self.probe(target, probe_url, &mut run, &correlation_id).await
                    }
                    None => {
                        run.trace
                            .note("Scrape inconclusive and no probe URL configured");
                        (HealthStatus::Unknown, Resolution::Inconclusive)
                    }
                },
            }
        };

        run.enter(CheckPhase::Resolved);
        self.logger.check_end(
            &target.id,
            status.as_str(),
            &format!("{:?}", resolution),
            started.elapsed().as_millis() as u64,
            &correlation_id,
        );

        CheckResult {
            target_id: target.id.clone(),
            status,
            trace: run.trace.finish(),
            timestamp: self.clock.now(),
            resolution,
            phases: run.phases,
            components: run.components,
        }
    }

    /// Check independent targets concurrently; results keep input order
    pub async fn run_all(&self, targets: &[CheckTarget]) -> Vec<CheckResult> {
        futures::future::join_all(targets.iter().map(|target| self.run_check(target))).await
    }

    /// Scrape path; `None` means inconclusive
    async fn scrape(
        &self,
        target: &CheckTarget,
        scrape_url: &str,
        run: &mut CheckRun,
        correlation_id: &str,
    ) -> Option<(HealthStatus, Resolution)> {
        let logger = &self.logger;
        let fetched = self
            .relay
            .fetch_with_observer(scrape_url, &target.relays, |relay, error| {
                let message = error.map(|e| e.to_string());
                logger.relay_attempt(&target.id, &relay.id, message.as_deref(), correlation_id);
            })
            .await;

        let text = match fetched {
            Ok(text) => text,
            Err(e) => {
                run.trace.note(format!("Scrape failed: {}", e));
                return None;
            }
        };

        run.trace.excerpt(&text);

        if let Some(group) = &target.component_group {
            match extract_component_group(&text, group) {
                Ok(components) => {
                    let status = rollup(&components);
                    run.trace.note(format!(
                        "{} components under {}: {}",
                        components.len(),
                        group,
                        status
                    ));
                    run.components = components;
                    if status.is_conclusive() {
                        return Some((status, Resolution::Components));
                    }
                }
                Err(e) => run.trace.note(format!("Component extraction failed: {}", e)),
            }
        }

        let classification = classify_detailed(&text, &target.rules);
        if let Some(index) = classification.matched_rule {
            let described = target
                .rules
                .get(index)
                .map(|rule| rule.pattern.describe())
                .unwrap_or_default();
            if classification.status.is_conclusive() {
                run.trace.note(format!(
                    "Matched rule {} {} -> {}",
                    index + 1,
                    described,
                    classification.status
                ));
                return Some((classification.status, Resolution::Classified));
            }
            run.trace.note(format!(
                "Matched rule {} {} -> {}, not a decisive status",
                index + 1,
                described,
                classification.status
            ));
            return None;
        }

        match classification.challenge_marker {
            Some(marker) => run.trace.note(format!(
                "No classification rule matched, bot challenge page detected (\"{}\")",
                marker
            )),
            None => run.trace.note("No classification rule matched"),
        }
        None
    }

    async fn probe(
        &self,
        target: &CheckTarget,
        probe_url: &str,
        run: &mut CheckRun,
        correlation_id: &str,
    ) -> (HealthStatus, Resolution) {
        run.trace.note("Attempting direct probe");
        let started = Instant::now();
        let outcome = self.probe.probe_outcome(probe_url).await;
        self.logger.probe_end(
            &target.id,
            outcome.is_reachable(),
            started.elapsed().as_millis() as u64,
            correlation_id,
        );

        match outcome {
            ProbeOutcome::Loaded => {
                run.trace.note("Direct probe succeeded");
                (HealthStatus::Healthy, Resolution::ProbeReachable)
            }
            ProbeOutcome::Failed(e) => {
                run.trace.note(format!("Direct probe failed: {}", e));
                (HealthStatus::Unreachable, Resolution::ProbeUnreachable)
            }
        }
    }
}
