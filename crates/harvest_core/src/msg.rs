use crate::{ItemOutcome, Visit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run.
    Start,
    /// Result of one container lookup.
    ContainerProbed { found: bool },
    /// Item count observed after scrolling the container to its end.
    ItemsCounted { count: usize },
    /// Items captured once loading completed, in render order.
    ItemsListed { count: usize },
    /// The engine finished visiting one item.
    VisitFinished { visit: Visit, outcome: ItemOutcome },
}
