//! Metrics for generation API calls.
//!
//! Instruments are created on the global meter, so they are no-ops until the
//! application installs a meter provider.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<ImageMetrics> = OnceLock::new();

/// Metrics for image and analysis calls, labeled by provider and model.
#[derive(Clone)]
pub struct ImageMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Total API requests
    pub requests: Counter<u64>,
    /// Failed API requests
    pub errors: Counter<u64>,
    /// Successful calls that returned no image
    pub empty_payloads: Counter<u64>,
    /// API call duration in seconds
    pub duration: Histogram<f64>,
}

impl ImageMetrics {
    fn init() -> Self {
        let meter = global::meter("storyboard");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("storyboard.requests")
                .with_description("Total generation API requests")
                .build(),
            errors: meter
                .u64_counter("storyboard.errors")
                .with_description("Failed generation API requests")
                .build(),
            empty_payloads: meter
                .u64_counter("storyboard.empty_payloads")
                .with_description("Image calls that returned no image data")
                .build(),
            duration: meter
                .f64_histogram("storyboard.duration")
                .with_unit("seconds")
                .with_description("Generation API call duration")
                .build(),
        }
    }

    /// Get the global metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a completed request.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed request. `error_type` is a stable label such as
    /// `rate_limited`.
    pub fn record_error(&self, provider: &str, model: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.errors.add(1, labels);
    }

    /// Record an image call that returned nothing.
    pub fn record_empty(&self, provider: &str, model: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.empty_payloads.add(1, labels);
    }
}
