//! Sequential batch generation.

use crate::{PipelineContext, compose_prompt, fallback};
use std::time::Duration;
use storyboard_core::{FailureKind, GeneratedItem, GenerationRequest, ItemFailure};
use storyboard_error::{ImageApiError, StoryboardError, StoryboardResult};
use storyboard_interface::{BatchProgress, ImageGenerator};
use storyboard_rate_limit::{CallError, call_with_retry_notify};
use tracing::{debug, error, info, instrument, warn};

/// How one item of a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The primary prompt or the fallback produced an image
    Succeeded(GeneratedItem),
    /// Both attempts failed
    Failed {
        /// What went wrong
        failure: ItemFailure,
        /// Empty-image entry keeping the original text
        placeholder: GeneratedItem,
    },
}

impl ItemOutcome {
    /// True for [`ItemOutcome::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Position of the item in its batch.
    pub fn position(&self) -> usize {
        match self {
            Self::Succeeded(item) => item.position,
            Self::Failed { failure, .. } => failure.position,
        }
    }

    fn failed(
        position: usize,
        request: &GenerationRequest,
        prompt: String,
        error_kind: FailureKind,
        message: String,
    ) -> Self {
        Self::Failed {
            failure: ItemFailure {
                position,
                subject_id: request.subject_id.clone(),
                subject_name: request.subject_name.clone(),
                error_kind,
                message,
            },
            placeholder: GeneratedItem::placeholder(position, request, prompt),
        }
    }
}

/// Runs requests one at a time, in order, with a pause between items.
///
/// Each item gets a retried primary call and at most one fallback call.
/// Per-item failures are recorded and the batch moves on; only a rejected
/// credential stops it.
pub struct BatchGenerator<'a, G: ?Sized> {
    generator: &'a G,
    context: &'a PipelineContext,
}

impl<'a, G> BatchGenerator<'a, G>
where
    G: ImageGenerator + ?Sized,
{
    /// Creates a batch generator.
    pub fn new(generator: &'a G, context: &'a PipelineContext) -> Self {
        Self { generator, context }
    }

    /// Generate every request in order.
    ///
    /// Returns one outcome per request, in input order. Sleeps
    /// `inter_item_delay` before every item except the first.
    ///
    /// # Errors
    ///
    /// Returns an error only when the service rejects the credential, since
    /// every later item would fail the same way.
    #[instrument(
        skip(self, requests),
        fields(total = requests.len(), provider = self.generator.provider_name())
    )]
    pub async fn generate_batch(
        &self,
        requests: &[GenerationRequest],
        inter_item_delay: Duration,
    ) -> StoryboardResult<Vec<ItemOutcome>> {
        let total = requests.len();
        let mut outcomes = Vec::with_capacity(total);

        for (position, request) in requests.iter().enumerate() {
            let cancel = self.context.cancellation();

            if position > 0 && !cancel.is_cancelled() && !inter_item_delay.is_zero() {
                self.context.emit(BatchProgress::Waiting {
                    delay_ms: inter_item_delay.as_millis() as u64,
                });
                tokio::time::sleep(inter_item_delay).await;
            }

            if cancel.is_cancelled() {
                debug!(position, "Batch cancelled, skipping item");
                outcomes.push(ItemOutcome::failed(
                    position,
                    request,
                    compose_prompt(request),
                    FailureKind::Cancelled,
                    "Batch cancelled before this item started".to_string(),
                ));
                continue;
            }

            self.context.emit(BatchProgress::ItemStarted {
                position,
                total,
                subject: request.subject_name.clone(),
            });

            let outcome = self.generate_item(position, request).await?;

            self.context.emit(BatchProgress::ItemFinished {
                position,
                subject: request.subject_name.clone(),
                succeeded: outcome.is_success(),
            });
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(succeeded, failed = total - succeeded, "Batch finished");
        Ok(outcomes)
    }

    /// Generate one item: retried primary prompt, then the fallback.
    #[instrument(
        skip(self, request),
        fields(subject = %request.subject_name, kind = %request.kind)
    )]
    pub async fn generate_item(
        &self,
        position: usize,
        request: &GenerationRequest,
    ) -> StoryboardResult<ItemOutcome> {
        let prompt = compose_prompt(request);
        let aspect_ratio = *request.style_params.aspect_ratio();
        let context = self.context;
        let generator = self.generator;

        let primary = call_with_retry_notify(
            &context.config().retry,
            || {
                let prompt = prompt.as_str();
                let references = request.references.as_slice();
                async move {
                    context.acquire().await;
                    generator
                        .generate_image(prompt, aspect_ratio, references)
                        .await
                }
            },
            |attempt, delay: Duration, _: &ImageApiError| {
                context.emit(BatchProgress::Retrying {
                    attempt,
                    delay_ms: delay.as_millis() as u64,
                });
            },
        )
        .await;

        let (primary_kind, primary_message) = match primary {
            Ok(Some(image)) if !image.is_empty() => {
                debug!("Primary prompt produced an image");
                return Ok(ItemOutcome::Succeeded(GeneratedItem::success(
                    position, request, prompt, image,
                )));
            }
            Ok(_) => {
                warn!("Primary prompt returned no image data");
                (
                    FailureKind::EmptyPayload,
                    "No image data returned".to_string(),
                )
            }
            Err(e) if e.inner().kind.is_credential_error() => {
                error!(error = %e, "Credential rejected, aborting batch");
                return Err(StoryboardError::from(e));
            }
            Err(e) => {
                let kind = match &e {
                    CallError::MaxRetriesExceeded { .. } => FailureKind::MaxRetriesExceeded,
                    CallError::Fatal(inner) => FailureKind::from(&inner.kind),
                };
                warn!(error = %e, "Primary prompt failed");
                (kind, e.to_string())
            }
        };

        context.emit(BatchProgress::Fallback {
            subject: request.subject_name.clone(),
        });

        match fallback(
            generator,
            position,
            request,
            &context.config().fallback,
            context.throttle(),
        )
        .await
        {
            Ok(image) => {
                info!("Fallback prompt produced an image");
                let mut item =
                    GeneratedItem::success(position, request, image.prompt, image.image);
                item.used_fallback = true;
                item.replacements = image.replacements;
                Ok(ItemOutcome::Succeeded(item))
            }
            Err(failure) => {
                warn!(kind = %primary_kind, "Item failed after fallback");
                Ok(ItemOutcome::failed(
                    position,
                    request,
                    prompt,
                    primary_kind,
                    format!("{}; fallback: {}", primary_message, failure.message),
                ))
            }
        }
    }
}
