pub mod debug_logger;
pub mod health;

pub use debug_logger::{get_debug_logger, DebugLogger};
pub use health::{CheckResult, CheckTarget, HealthCheckOrchestrator, HealthStatus, StatusBoard};
