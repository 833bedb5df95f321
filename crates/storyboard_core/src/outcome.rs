//! Aggregated batch results.

use crate::{FailureKind, GeneratedItem, ItemFailure};
use serde::{Deserialize, Serialize};
use storyboard_error::{GenerationError, GenerationErrorKind};

/// Overall result of a batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSummary {
    /// No failures (including the empty batch)
    #[display("all succeeded")]
    AllSucceeded,
    /// Some succeeded, some failed
    #[display("partial")]
    Partial,
    /// Nothing succeeded
    #[display("total failure")]
    TotalFailure,
}

impl OutcomeSummary {
    /// Classify from success and failure counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::OutcomeSummary;
    ///
    /// assert_eq!(OutcomeSummary::classify(0, 0), OutcomeSummary::AllSucceeded);
    /// assert_eq!(OutcomeSummary::classify(4, 1), OutcomeSummary::Partial);
    /// assert_eq!(OutcomeSummary::classify(0, 5), OutcomeSummary::TotalFailure);
    /// ```
    pub fn classify(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => Self::AllSucceeded,
            (0, _) => Self::TotalFailure,
            _ => Self::Partial,
        }
    }
}

/// What happens to failed items in the returned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Failed items are left out (personas)
    Drop,
    /// Failed items stay as empty-image entries (scenes)
    Placeholder,
}

/// Result of a sequential batch.
///
/// `succeeded_count() + failed.len() == requested` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Items in input order
    pub items: Vec<GeneratedItem>,
    /// Failures in input order
    pub failed: Vec<ItemFailure>,
    /// Number of items requested
    pub requested: usize,
    /// Overall classification
    pub summary: OutcomeSummary,
}

impl BatchOutcome {
    /// Number of items that carry an image.
    pub fn succeeded_count(&self) -> usize {
        self.items.iter().filter(|item| item.has_image()).count()
    }

    /// True when every failure is a cancellation and there was at least one.
    pub fn was_cancelled(&self) -> bool {
        !self.failed.is_empty()
            && self
                .failed
                .iter()
                .all(|failure| failure.error_kind == FailureKind::Cancelled)
    }

    /// Human-readable count summary.
    pub fn status_message(&self) -> String {
        match self.summary {
            OutcomeSummary::AllSucceeded => {
                format!("All {} images generated", self.requested)
            }
            OutcomeSummary::Partial => format!(
                "{} of {} images generated, {} failed",
                self.succeeded_count(),
                self.requested,
                self.failed.len()
            ),
            OutcomeSummary::TotalFailure => {
                format!("All {} images failed", self.requested)
            }
        }
    }

    /// Turn a total failure into one aggregate error.
    ///
    /// `label` names what was generated ("personas", "scenes"). A batch that
    /// was cancelled before any item ran is returned as-is, with every item
    /// in `failed` marked [`FailureKind::Cancelled`].
    pub fn into_result(self, label: &str) -> Result<Self, GenerationError> {
        if self.summary != OutcomeSummary::TotalFailure || self.was_cancelled() {
            return Ok(self);
        }
        let summary = self
            .failed
            .iter()
            .map(|failure| failure.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(GenerationError::new(GenerationErrorKind::TotalFailure {
            label: label.to_string(),
            requested: self.requested,
            summary,
        }))
    }
}
