use std::time::Duration;

use crate::{RunSummary, Visit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Wait `after`, then look for the container and report `Msg::ContainerProbed`.
    ProbeContainer { after: Duration },
    /// Wait `after`, scroll the container to its end, count items and report `Msg::ItemsCounted`.
    ScrollAndCount { after: Duration },
    /// Capture the current item list and report `Msg::ItemsListed`.
    ListItems,
    /// Visit one item and report `Msg::VisitFinished`.
    Visit(Visit),
    /// The container never appeared; the run is over.
    ContainerMissing { attempts: u32 },
    /// Every item has been visited.
    Finished(RunSummary),
}
