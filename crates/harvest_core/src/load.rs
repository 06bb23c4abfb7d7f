//! Readiness and load-completion detection as a pure transition function.
//!
//! The host page renders items asynchronously as they scroll into view, so
//! there is no "fully loaded" signal. Completion is declared once the item
//! count has failed to grow for `threshold` consecutive ticks.

/// Where the loading phase currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Container not found yet; `attempts` probes have failed so far.
    Waiting { attempts: u32 },
    /// The last tick grew the item count (or no tick has run yet).
    Polling { count: usize },
    /// The last `stalled` ticks did not exceed `count`.
    Stalling { count: usize, stalled: u32 },
    /// Loading finished with `count` items observed.
    Complete { count: usize },
}

/// What the driver should do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Probe for the container again.
    Probe,
    /// Scroll to the end and count again.
    Tick,
    /// Readiness bound exceeded.
    GiveUp { attempts: u32 },
    /// Loading is complete; reported exactly once.
    Complete { count: usize },
    /// The observation did not apply to the current state.
    Ignore,
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Waiting { attempts: 0 }
    }
}

impl LoadState {
    /// Applies the result of one container probe.
    pub fn on_probe(self, found: bool, max_attempts: Option<u32>) -> (LoadState, LoadAction) {
        let LoadState::Waiting { attempts } = self else {
            return (self, LoadAction::Ignore);
        };
        if found {
            return (LoadState::Polling { count: 0 }, LoadAction::Tick);
        }
        let attempts = attempts.saturating_add(1);
        match max_attempts {
            Some(max) if attempts >= max => {
                (LoadState::Waiting { attempts }, LoadAction::GiveUp { attempts })
            }
            _ => (LoadState::Waiting { attempts }, LoadAction::Probe),
        }
    }

    /// Applies one item count observed after scrolling to the end.
    ///
    /// A count that drops below the best one seen so far counts as a stall.
    pub fn on_count(self, observed: usize, threshold: u32) -> (LoadState, LoadAction) {
        let threshold = threshold.max(1);
        let (best, stalled) = match self {
            LoadState::Polling { count } => (count, 0),
            LoadState::Stalling { count, stalled } => (count, stalled),
            LoadState::Waiting { .. } | LoadState::Complete { .. } => {
                return (self, LoadAction::Ignore)
            }
        };

        if observed > best {
            return (LoadState::Polling { count: observed }, LoadAction::Tick);
        }

        let stalled = stalled.saturating_add(1);
        if stalled >= threshold {
            (
                LoadState::Complete { count: best },
                LoadAction::Complete { count: best },
            )
        } else {
            (
                LoadState::Stalling {
                    count: best,
                    stalled,
                },
                LoadAction::Tick,
            )
        }
    }

    /// Best item count seen so far.
    pub fn count(&self) -> usize {
        match *self {
            LoadState::Waiting { .. } => 0,
            LoadState::Polling { count }
            | LoadState::Stalling { count, .. }
            | LoadState::Complete { count } => count,
        }
    }

    /// Consecutive non-growing ticks so far.
    pub fn stalled(&self) -> u32 {
        match *self {
            LoadState::Stalling { stalled, .. } => stalled,
            _ => 0,
        }
    }
}
