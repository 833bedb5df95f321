//! Shared state for one pipeline run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use storyboard_interface::{BatchProgress, ProgressObserver};
use storyboard_rate_limit::{RequestThrottle, StoryboardConfig};

/// Cooperative cancellation, checked before each item starts.
///
/// Clones share the same flag.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::CancellationFlag;
///
/// let flag = CancellationFlag::default();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Request cancellation. Items already in flight finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration, throttle, cancellation and progress reporting for a run.
#[derive(Clone)]
pub struct PipelineContext {
    config: StoryboardConfig,
    throttle: Option<RequestThrottle>,
    cancel: CancellationFlag,
    observer: Option<ProgressObserver>,
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("config", &self.config)
            .field("throttle", &self.throttle)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl PipelineContext {
    /// Creates a context. A throttle is installed when
    /// `gemini.requests_per_minute` is set and non-zero.
    pub fn new(config: StoryboardConfig) -> Self {
        let throttle = config
            .gemini
            .requests_per_minute
            .and_then(RequestThrottle::per_minute);
        Self {
            config,
            throttle,
            cancel: CancellationFlag::default(),
            observer: None,
        }
    }

    /// Report progress to `observer`.
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use an externally owned cancellation flag.
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &StoryboardConfig {
        &self.config
    }

    /// Request throttle, if any.
    pub fn throttle(&self) -> Option<&RequestThrottle> {
        self.throttle.as_ref()
    }

    /// Cancellation flag for this run.
    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Wait for a throttle slot, if throttling is on.
    pub(crate) async fn acquire(&self) {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }
    }

    pub(crate) fn emit(&self, event: BatchProgress) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }
}
