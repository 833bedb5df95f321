//! Progress events emitted while a batch runs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Something a running batch wants a caller to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum BatchProgress {
    /// Script analysis started
    #[display("Analyzing script")]
    Analyzing,
    /// Waiting between items
    #[display("Waiting {}s before the next image", delay_ms / 1000)]
    Waiting {
        /// Delay in milliseconds
        delay_ms: u64,
    },
    /// Item started
    #[display("Generating {}/{}: {}", position + 1, total, subject)]
    ItemStarted {
        /// Zero-based position
        position: usize,
        /// Batch size
        total: usize,
        /// Subject name
        subject: String,
    },
    /// A transient error is being retried
    #[display("Rate limited, retrying in {}s (attempt {})", delay_ms / 1000, attempt)]
    Retrying {
        /// Attempt that just failed (1-based)
        attempt: usize,
        /// Delay before the next attempt
        delay_ms: u64,
    },
    /// Primary attempt failed, trying the simplified prompt
    #[display("Retrying {} with a simpler prompt", subject)]
    Fallback {
        /// Subject name
        subject: String,
    },
    /// Item done
    #[display("Finished {}: {}", subject, if *succeeded { "ok" } else { "failed" })]
    ItemFinished {
        /// Zero-based position
        position: usize,
        /// Subject name
        subject: String,
        /// Whether an image was produced
        succeeded: bool,
    },
}

/// Callback receiving progress events.
pub type ProgressObserver = Arc<dyn Fn(&BatchProgress) + Send + Sync>;
