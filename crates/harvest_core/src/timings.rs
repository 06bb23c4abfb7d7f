use std::time::Duration;

/// Delays and bounds that gate every transition of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// Pause before the first container probe.
    pub start_delay: Duration,
    /// Interval between container probes.
    pub readiness_poll_interval: Duration,
    /// Give up after this many failed probes. `None` polls forever.
    pub readiness_max_attempts: Option<u32>,
    /// Interval between scroll-and-count ticks.
    pub scroll_interval: Duration,
    /// Consecutive non-growing ticks before loading is declared complete.
    pub stall_threshold: u32,
    /// Blind wait after activating an item.
    pub settle_delay: Duration,
}

impl Timings {
    /// All delays zero; useful for driving the machine synchronously.
    pub fn immediate(stall_threshold: u32) -> Self {
        Self {
            start_delay: Duration::ZERO,
            readiness_poll_interval: Duration::ZERO,
            readiness_max_attempts: None,
            scroll_interval: Duration::ZERO,
            stall_threshold,
            settle_delay: Duration::ZERO,
        }
    }

    pub(crate) fn effective_threshold(&self) -> u32 {
        self.stall_threshold.max(1)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(3_000),
            readiness_poll_interval: Duration::from_millis(1_000),
            readiness_max_attempts: Some(300),
            scroll_interval: Duration::from_millis(2_000),
            stall_threshold: 60,
            settle_delay: Duration::from_millis(6_000),
        }
    }
}
