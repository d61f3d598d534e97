//! Presentation Binding
//!
//! Holds the displayed state of each target and guards it against stale
//! completions. Every refresh takes a ticket from a monotonically increasing
//! counter; a result is applied only if its ticket is still the latest one
//! issued for that view. A refresh never cancels an earlier in-flight check,
//! the earlier result is simply dropped when it lands.

use crate::core::debug_logger::DebugLogger;
use crate::core::health::orchestrator::HealthCheckOrchestrator;
use crate::core::health::types::{CheckResult, CheckTarget, HealthStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Token identifying one refresh of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What a view currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub status: HealthStatus,
    /// Last applied result
    pub result: Option<CheckResult>,
    /// Ticket of the last applied result, 0 before the first one
    pub applied_ticket: u64,
}

/// Displayed state of one target
pub struct StatusView {
    target: CheckTarget,
    issued: AtomicU64,
    state: Mutex<ViewState>,
    logger: Arc<DebugLogger>,
}

impl StatusView {
    pub fn new(target: CheckTarget) -> Self {
        Self {
            target,
            issued: AtomicU64::new(0),
            state: Mutex::new(ViewState {
                status: HealthStatus::Unknown,
                result: None,
                applied_ticket: 0,
            }),
            logger: Arc::new(DebugLogger::disabled()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<DebugLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn target(&self) -> &CheckTarget {
        &self.target
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a new ticket and show `Loading` until a result lands
    pub fn begin_refresh(&self) -> RefreshTicket {
        let mut state = self.lock_state();
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        state.status = HealthStatus::Loading;
        RefreshTicket(ticket)
    }

    /// Apply `result` if `ticket` is still the latest issued
    ///
    /// # Returns
    /// * `true` - result is now displayed
    /// * `false` - a newer refresh was issued, result discarded
    pub fn complete(&self, ticket: RefreshTicket, result: CheckResult) -> bool {
        let mut state = self.lock_state();
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.0 != latest {
            drop(state);
            self.logger.stale_result(&self.target.id, ticket.0, latest);
            return false;
        }

        state.status = result.status;
        state.result = Some(result);
        state.applied_ticket = ticket.0;
        true
    }

    /// Run a check for this view's target and apply it unless superseded
    pub async fn refresh(&self, orchestrator: &HealthCheckOrchestrator) -> bool {
        let ticket = self.begin_refresh();
        let result = orchestrator.run_check(&self.target).await;
        self.complete(ticket, result)
    }

    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> HealthStatus {
        self.lock_state().status
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock_state().clone()
    }
}

/// A screen of views refreshed together
pub struct StatusBoard {
    views: Vec<StatusView>,
}

impl StatusBoard {
    pub fn new(targets: Vec<CheckTarget>) -> Self {
        Self {
            views: targets.into_iter().map(StatusView::new).collect(),
        }
    }

    pub fn with_logger(self, logger: Arc<DebugLogger>) -> Self {
        Self {
            views: self
                .views
                .into_iter()
                .map(|view| view.with_logger(logger.clone()))
                .collect(),
        }
    }

    /// Refresh every view concurrently, as on first display
    pub async fn mount(&self, orchestrator: &HealthCheckOrchestrator) {
        futures::future::join_all(self.views.iter().map(|view| view.refresh(orchestrator))).await;
    }

    /// Refresh one view by target id; `false` if unknown or superseded
    pub async fn refresh(&self, target_id: &str, orchestrator: &HealthCheckOrchestrator) -> bool {
        match self.view(target_id) {
            Some(view) => view.refresh(orchestrator).await,
            None => false,
        }
    }

    pub fn view(&self, target_id: &str) -> Option<&StatusView> {
        self.views.iter().find(|view| view.target().id == target_id)
    }

    pub fn views(&self) -> &[StatusView] {
        &self.views
    }
}
