//! Folding item outcomes into a batch result.

use crate::ItemOutcome;
use storyboard_core::{BatchOutcome, FailurePolicy, OutcomeSummary};
use tracing::debug;

/// Partition `outcomes` into items and failures, preserving order.
///
/// With [`FailurePolicy::Drop`] failed items are left out of `items`; with
/// [`FailurePolicy::Placeholder`] they stay as empty-image entries.
pub fn aggregate(outcomes: Vec<ItemOutcome>, policy: FailurePolicy) -> BatchOutcome {
    let requested = outcomes.len();
    let mut items = Vec::with_capacity(requested);
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome {
            ItemOutcome::Succeeded(item) => items.push(item),
            ItemOutcome::Failed {
                failure,
                placeholder,
            } => {
                if policy == FailurePolicy::Placeholder {
                    items.push(placeholder);
                }
                failed.push(failure);
            }
        }
    }

    let summary = OutcomeSummary::classify(requested - failed.len(), failed.len());
    debug!(requested, failed = failed.len(), %summary, "Aggregated batch");

    BatchOutcome {
        items,
        failed,
        requested,
        summary,
    }
}
