//! Harvest engine: document access, asset fetching, persistence and the effect runner.
mod browser;
mod document;
mod extract;
mod fetch;
mod harvester;
mod persist;
mod types;

pub use browser::{CdpDocument, PageFetcher};
pub use document::{HostDocument, Locators};
pub use extract::{AssetExtractor, ExtractError, ImageScope};
pub use fetch::{AssetFetcher, FetchSettings, ReqwestFetcher};
pub use harvester::{HarvestSettings, Harvester};
pub use persist::{ensure_output_dir, AtomicFileWriter, DirectorySink, FileSink, PersistError};
pub use types::{
    Activation, ActiveSnapshot, DocumentError, FailureKind, FetchError, FetchMetadata,
    FetchOutput, HarvestError, ImageAsset, ItemError, TitleSources,
};
