//! Harvest core: pure run state machine, visit plan and output naming.
mod effect;
mod load;
mod msg;
mod naming;
mod plan;
mod state;
mod summary;
mod timings;
mod update;
mod view_model;

pub use effect::Effect;
pub use load::{LoadAction, LoadState};
pub use msg::Msg;
pub use naming::{
    display_title, image_extension, sanitize_filename, OutputNames, FALLBACK_EXTENSION,
    UNTITLED,
};
pub use plan::{visit_order, Visit};
pub use state::{HarvestRun, Stage};
pub use summary::{FailedVisit, ItemOutcome, RunSummary, SkipReason};
pub use timings::Timings;
pub use update::update;
pub use view_model::RunView;
