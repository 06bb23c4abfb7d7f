use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use harvest_core::{
    display_title, update, Effect, HarvestRun, ItemOutcome, LoadState, Msg, OutputNames,
    RunSummary, SkipReason, Stage, Timings, Visit,
};
use harvest_logging::{harvest_debug, harvest_error, harvest_info, harvest_warn, Phase};

use crate::{
    Activation, ActiveSnapshot, AssetExtractor, AssetFetcher, ExtractError, FileSink,
    HarvestError, HostDocument, ImageScope, ItemError, Locators,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSettings {
    pub timings: Timings,
    pub image_selector: String,
    pub image_scope: ImageScope,
}

impl HarvestSettings {
    pub fn new(timings: Timings, locators: &Locators) -> Self {
        Self {
            timings,
            image_selector: locators.image.clone(),
            image_scope: match &locators.image_region {
                Some(region) => ImageScope::Region(region.clone()),
                None => ImageScope::Document,
            },
        }
    }
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self::new(Timings::default(), &Locators::default())
    }
}

/// Drives one [`HarvestRun`] against a live document.
///
/// Executes the effects produced by [`harvest_core::update`] one at a time and
/// feeds the observations back as messages. Nothing here runs concurrently:
/// each item is activated, captured and persisted before the next one is touched.
pub struct Harvester<D: HostDocument> {
    document: D,
    extractor: AssetExtractor,
    sink: Arc<dyn FileSink>,
    timings: Timings,
}

impl<D: HostDocument> Harvester<D> {
    pub fn new(
        document: D,
        fetcher: Arc<dyn AssetFetcher>,
        sink: Arc<dyn FileSink>,
        settings: HarvestSettings,
    ) -> Result<Self, ExtractError> {
        let extractor =
            AssetExtractor::new(fetcher, &settings.image_selector, &settings.image_scope)?;
        Ok(Self {
            document,
            extractor,
            sink,
            timings: settings.timings,
        })
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Runs to completion. Only a missing container, or a document that cannot
    /// list its items once loading is done, ends the run with an error.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let mut run = HarvestRun::new(self.timings.clone());
        let mut items: Vec<D::Item> = Vec::new();
        let mut inbox = VecDeque::from([Msg::Start]);

        harvest_info!(Phase::WaitForContainer, "Waiting for the list container...");

        while let Some(msg) = inbox.pop_front() {
            let counted = matches!(msg, Msg::ItemsCounted { .. });
            let (next, effects) = update(run, msg);
            run = next;
            if counted {
                log_load_progress(&run);
            }

            for effect in effects {
                match effect {
                    Effect::ProbeContainer { after } => {
                        delay(after).await;
                        let found = self.probe_container().await;
                        inbox.push_back(Msg::ContainerProbed { found });
                    }
                    Effect::ScrollAndCount { after } => {
                        delay(after).await;
                        let count = self.scroll_and_count().await;
                        inbox.push_back(Msg::ItemsCounted { count });
                    }
                    Effect::ListItems => {
                        items = self.document.list_items().await?;
                        if items.is_empty() {
                            harvest_info!(Phase::ClickPhase, "No items found!");
                        } else {
                            harvest_info!(
                                Phase::ClickPhase,
                                "Found {} items. Iterating from bottom to top...",
                                items.len()
                            );
                        }
                        inbox.push_back(Msg::ItemsListed { count: items.len() });
                    }
                    Effect::Visit(visit) => {
                        let outcome = match items.get(visit.render_index) {
                            Some(item) => self.visit(item, visit).await,
                            None => ItemOutcome::Skipped(SkipReason::ItemMissing),
                        };
                        inbox.push_back(Msg::VisitFinished { visit, outcome });
                    }
                    Effect::ContainerMissing { attempts } => {
                        harvest_error!(
                            Phase::WaitForContainer,
                            "Container not found after {} attempts. Giving up.",
                            attempts
                        );
                        return Err(HarvestError::ContainerNotFound { attempts });
                    }
                    Effect::Finished(summary) => {
                        log_summary(&summary);
                        return Ok(summary);
                    }
                }
            }
        }

        Ok(run.summary().clone())
    }

    async fn probe_container(&self) -> bool {
        match self.document.container_present().await {
            Ok(true) => {
                harvest_info!(Phase::WaitForContainer, "Container found.");
                harvest_info!(
                    Phase::AutoScroll,
                    "Scrolling until no new items appear..."
                );
                true
            }
            Ok(false) => {
                harvest_info!(
                    Phase::WaitForContainer,
                    "Container not found yet. Retrying..."
                );
                false
            }
            Err(err) => {
                harvest_warn!(Phase::WaitForContainer, "Container lookup failed: {}", err);
                false
            }
        }
    }

    /// A failed tick reports zero items, which the detector treats as no growth.
    async fn scroll_and_count(&self) -> usize {
        if let Err(err) = self.document.scroll_to_end().await {
            harvest_warn!(Phase::AutoScroll, "Scroll failed: {}", err);
        }
        match self.document.count_items().await {
            Ok(count) => {
                harvest_debug!(Phase::AutoScroll, "Current item count: {}", count);
                count
            }
            Err(err) => {
                harvest_warn!(Phase::AutoScroll, "Item count failed: {}", err);
                0
            }
        }
    }

    async fn visit(&self, item: &D::Item, visit: Visit) -> ItemOutcome {
        let id = self
            .document
            .item_id(item)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| "-".to_string());
        harvest_info!(
            Phase::ClickPhase,
            "Clicking item #{}, id={}",
            visit.reverse_index,
            id
        );

        if let Err(err) = self.document.reveal(item).await {
            harvest_debug!(
                Phase::ClickPhase,
                "Could not scroll item #{} into view: {}",
                visit.reverse_index,
                err
            );
        }

        match self.capture_item(item, visit).await {
            Ok(outcome) => outcome,
            Err(ItemError::ActivationHandleMissing) => {
                harvest_warn!(
                    Phase::ClickPhase,
                    "No clickable element found in item #{}, skipping.",
                    visit.reverse_index
                );
                ItemOutcome::Skipped(SkipReason::ActivationHandleMissing)
            }
            Err(err) => {
                harvest_error!(
                    Phase::ClickPhase,
                    "Error processing item #{}: {}",
                    visit.reverse_index,
                    err
                );
                ItemOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn capture_item(&self, item: &D::Item, visit: Visit) -> Result<ItemOutcome, ItemError> {
        if self.document.activate(item).await? == Activation::HandleMissing {
            return Err(ItemError::ActivationHandleMissing);
        }
        harvest_info!(
            Phase::ClickPhase,
            "Clicked. Waiting {:?} for content to load...",
            self.timings.settle_delay
        );
        delay(self.timings.settle_delay).await;

        let snapshot = self.document.capture().await?;
        let sources = self.document.item_title(item).await?;
        let title = display_title(sources.attribute.as_deref(), sources.text.as_deref());
        let names = OutputNames::new(visit.reverse_index, &title);
        let snapshot_name = names.snapshot();

        harvest_info!(
            Phase::ClickPhase,
            "Title: {:?}, saving snapshot as {:?}",
            title,
            snapshot_name
        );
        let path = self.sink.save(snapshot.html.as_bytes(), &snapshot_name)?;
        harvest_debug!(Phase::ClickPhase, "Wrote {}", path.display());

        let (assets_saved, assets_failed) = self.save_images(&snapshot, &names, visit).await;
        Ok(ItemOutcome::Saved {
            snapshot: snapshot_name,
            assets_saved,
            assets_failed,
        })
    }

    /// Returns `(saved, failed)`. A failing image never stops the remaining ones.
    async fn save_images(
        &self,
        snapshot: &ActiveSnapshot,
        names: &OutputNames,
        visit: Visit,
    ) -> (usize, usize) {
        let assets = self.extractor.locate(snapshot);
        if assets.is_empty() {
            harvest_info!(
                Phase::ClickPhase,
                "No images found in item #{}.",
                visit.reverse_index
            );
            return (0, 0);
        }
        harvest_info!(
            Phase::ClickPhase,
            "Found {} image(s) in item #{}. Starting download...",
            assets.len(),
            visit.reverse_index
        );

        let mut saved = 0;
        let mut failed = 0;
        for (idx, asset) in assets.iter().enumerate() {
            let filename = names.asset(idx + 1, &asset.extension);
            harvest_info!(Phase::ClickPhase, "Saving image as {:?}", filename);
            let result = match self.extractor.fetch(asset).await {
                Ok(bytes) => self
                    .sink
                    .save(&bytes, &filename)
                    .map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            match result {
                Ok(_) => saved += 1,
                Err(reason) => {
                    harvest_error!(
                        Phase::ClickPhase,
                        "Failed to download image {:?}: {}",
                        asset.src,
                        reason
                    );
                    failed += 1;
                }
            }
        }
        (saved, failed)
    }
}

/// Suspends the run without blocking the runtime.
async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn log_load_progress(run: &HarvestRun) {
    let view = run.view();
    match run.stage() {
        Stage::Loading(LoadState::Polling { count }) => {
            harvest_info!(
                Phase::AutoScroll,
                "Items increased to {}. Resetting attempts.",
                count
            );
        }
        Stage::Loading(LoadState::Stalling { stalled, .. }) => {
            harvest_info!(
                Phase::AutoScroll,
                "No new items. Attempt #{}/{}",
                stalled,
                view.stall_threshold
            );
        }
        Stage::Loading(LoadState::Complete { count }) => {
            harvest_info!(
                Phase::AutoScroll,
                "No more items after {} checks. Stopping scroll at {} items.",
                view.stall_threshold,
                count
            );
        }
        _ => {}
    }
}

fn log_summary(summary: &RunSummary) {
    harvest_info!(Phase::Summary, "All items processed in reverse order!");
    harvest_info!(Phase::Summary, "{}", summary);
    for failure in &summary.failures {
        harvest_warn!(
            Phase::Summary,
            "Item #{} failed: {}",
            failure.reverse_index,
            failure.reason
        );
    }
}
