//! Per-attempt pipeline state machine.
//!
//! `Idle → Capturing → Cropping → Compressing → Encoding → Uploading →
//! {Done | Failed}`. Terminal states are final for the attempt; retrying is
//! modeled as a reset to `Idle` that discards every intermediate handle, so
//! a stale frame can never leak into a later attempt. There is no
//! cancellation once uploading has started.

use std::sync::Arc;

use quizshot_core::models::{Contact, UploadResult};
use quizshot_core::upload::{SubmitError, Uploader};

use crate::capture::{CaptureDevice, CaptureError};
use crate::compressor::{CompressorConfig, SizeBoundedCompressor};
use crate::crop::{crop_stage, CropTool};
use crate::encoder::{EncodeError, SubmissionEncoder};
use crate::handle::ImageHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Capturing,
    Cropping,
    Compressing,
    Encoding,
    Uploading,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("{action} is not valid in state {state:?}")]
    InvalidState {
        state: PipelineState,
        action: &'static str,
    },
}

/// One submission attempt at a time, owning its capability objects and the
/// chain of image handles. Stages run strictly sequentially; no two stages
/// overlap within an attempt.
pub struct SubmissionPipeline {
    state: PipelineState,
    frame: Option<ImageHandle>,
    device: Arc<dyn CaptureDevice>,
    crop_tool: Arc<dyn CropTool>,
    compressor: CompressorConfig,
    target_aspect: f64,
    uploader: Arc<dyn Uploader>,
}

impl SubmissionPipeline {
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        crop_tool: Arc<dyn CropTool>,
        compressor: CompressorConfig,
        target_aspect: f64,
        uploader: Arc<dyn Uploader>,
    ) -> Self {
        Self {
            state: PipelineState::Idle,
            frame: None,
            device,
            crop_tool,
            compressor,
            target_aspect,
            uploader,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }

    /// Capture a frame and crop it to the target aspect ratio. The attempt
    /// then rests with the cropped frame held, awaiting [`submit`] or
    /// [`retake`].
    ///
    /// [`submit`]: SubmissionPipeline::submit
    /// [`retake`]: SubmissionPipeline::retake
    pub async fn capture(&mut self) -> Result<(), PipelineError> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::InvalidState {
                state: self.state,
                action: "capture",
            });
        }

        self.advance(PipelineState::Capturing);
        let frame = match self.device.capture().await {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(error = %err, "capture failed");
                self.advance(PipelineState::Failed);
                return Err(err.into());
            }
        };

        self.advance(PipelineState::Cropping);
        let cropped = crop_stage(frame, self.target_aspect, self.crop_tool.as_ref()).await;
        self.frame = Some(cropped);
        Ok(())
    }

    /// Discard the in-flight frame and return to `Idle` for a fresh attempt.
    /// Dropping the handle chain deletes the staged temp files.
    pub fn retake(&mut self) {
        self.frame = None;
        self.advance(PipelineState::Idle);
    }

    /// Compress, encode, and upload the held frame.
    ///
    /// Contact validation runs before any image work; a validation failure
    /// leaves the attempt where it was (frame held, not terminal) so the
    /// caller can re-prompt and submit again without recapturing. Transport
    /// and server failures are terminal for the attempt.
    pub async fn submit(
        &mut self,
        contact: &Contact,
        device_id: &str,
    ) -> Result<UploadResult, PipelineError> {
        if self.state != PipelineState::Cropping {
            return Err(PipelineError::InvalidState {
                state: self.state,
                action: "submit",
            });
        }

        if let Err(err) = quizshot_core::validation::validate_contact(contact) {
            return Err(PipelineError::Encode(EncodeError::Validation(err)));
        }

        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => {
                return Err(PipelineError::InvalidState {
                    state: self.state,
                    action: "submit",
                })
            }
        };

        self.advance(PipelineState::Compressing);
        let compressed = SizeBoundedCompressor::compress(frame, &self.compressor).await;

        self.advance(PipelineState::Encoding);
        let payload = match SubmissionEncoder::encode(&compressed, contact, device_id).await {
            Ok(payload) => payload,
            Err(err @ EncodeError::Validation(_)) => {
                // Recoverable: keep the compressed frame and rest again
                self.frame = Some(compressed);
                self.advance(PipelineState::Cropping);
                return Err(err.into());
            }
            Err(err) => {
                self.advance(PipelineState::Failed);
                return Err(err.into());
            }
        };

        self.advance(PipelineState::Uploading);
        match self.uploader.submit(&payload).await {
            Ok(result) => {
                if result.is_success() {
                    tracing::info!(
                        submission_id = payload.submission_id(),
                        "submission accepted"
                    );
                    self.advance(PipelineState::Done);
                } else {
                    tracing::warn!(
                        submission_id = payload.submission_id(),
                        reason = result.message(),
                        "submission rejected"
                    );
                    self.advance(PipelineState::Failed);
                }
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                self.advance(PipelineState::Failed);
                Err(err.into())
            }
        }
    }
}
