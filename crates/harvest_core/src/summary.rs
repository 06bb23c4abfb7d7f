use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The item has no clickable or navigable element.
    ActivationHandleMissing,
    /// The item disappeared from the captured list before its turn.
    ItemMissing,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ActivationHandleMissing => write!(f, "activation handle missing"),
            SkipReason::ItemMissing => write!(f, "item missing from list"),
        }
    }
}

/// Result of visiting one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Saved {
        snapshot: String,
        assets_saved: usize,
        assets_failed: usize,
    },
    Skipped(SkipReason),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedVisit {
    pub reverse_index: usize,
    pub reason: String,
}

/// Counts accumulated over a run; reported once the last item is done.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub items_total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub assets_saved: usize,
    pub assets_failed: usize,
    pub failures: Vec<FailedVisit>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, reverse_index: usize, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Saved {
                assets_saved,
                assets_failed,
                ..
            } => {
                self.saved += 1;
                self.assets_saved += assets_saved;
                self.assets_failed += assets_failed;
            }
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed { reason } => {
                self.failed += 1;
                self.failures.push(FailedVisit {
                    reverse_index,
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Items that reached a terminal outcome.
    pub fn visited(&self) -> usize {
        self.saved + self.skipped + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items: {} saved, {} skipped, {} failed; images: {} saved, {} failed",
            self.items_total,
            self.saved,
            self.skipped,
            self.failed,
            self.assets_saved,
            self.assets_failed
        )
    }
}
