use std::collections::VecDeque;

use crate::view_model::RunView;
use crate::{visit_order, ItemOutcome, LoadState, RunSummary, Timings, Visit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    /// Waiting for the container or scrolling it until the count settles.
    Loading(LoadState),
    /// Exactly one item is being visited.
    Processing { current: Visit },
    Finished,
    /// The container never appeared.
    Aborted,
}

/// State of one harvest run, owned by whoever drives [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestRun {
    timings: Timings,
    stage: Stage,
    pending: VecDeque<Visit>,
    summary: RunSummary,
}

impl HarvestRun {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn load_state(&self) -> Option<LoadState> {
        match self.stage {
            Stage::Loading(state) => Some(state),
            _ => None,
        }
    }

    pub fn view(&self) -> RunView {
        let (item_count, stalled) = match self.stage {
            Stage::Loading(state) => (state.count(), state.stalled()),
            _ => (self.summary.items_total, 0),
        };
        RunView {
            stage: self.stage,
            item_count,
            stalled,
            stall_threshold: self.timings.effective_threshold(),
            remaining: self.pending.len(),
            summary: self.summary.clone(),
        }
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn plan_visits(&mut self, count: usize) {
        self.summary.items_total = count;
        self.pending = visit_order(count).collect();
    }

    /// Moves to the next planned visit, or finishes the run when none remain.
    pub(crate) fn advance(&mut self) -> Option<Visit> {
        match self.pending.pop_front() {
            Some(next) => {
                self.stage = Stage::Processing { current: next };
                Some(next)
            }
            None => {
                self.stage = Stage::Finished;
                None
            }
        }
    }

    pub(crate) fn record_outcome(&mut self, visit: Visit, outcome: &ItemOutcome) {
        self.summary.record(visit.reverse_index, outcome);
    }
}
