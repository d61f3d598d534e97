use chrono::{DateTime, Local};

/// Clock abstraction for dependency injection and testing
pub trait ClockTrait: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Milliseconds since the Unix epoch, used for cache busting
    fn epoch_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Production clock implementation using system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockTrait for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl ClockTrait for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
