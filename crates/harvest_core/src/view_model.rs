use crate::{RunSummary, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunView {
    pub stage: Stage,
    /// Best item count observed while loading.
    pub item_count: usize,
    pub stalled: u32,
    pub stall_threshold: u32,
    pub remaining: usize,
    pub summary: RunSummary,
}
