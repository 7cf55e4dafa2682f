//! Image pipeline for quiz submissions.
//!
//! One submission attempt moves a photographed entry through five strictly
//! sequential stages: capture → crop → compress → encode → upload. Each stage
//! consumes an owned [`ImageHandle`] and supersedes it with a new one; the
//! crop and compress stages degrade gracefully and always yield a handle.
//! [`SubmissionPipeline`] sequences the stages and tracks the attempt's
//! state machine.

pub mod capture;
pub mod compressor;
pub mod crop;
pub mod encoder;
pub mod handle;
pub mod pipeline;

pub use capture::{CaptureDevice, CaptureError, FileCapture};
pub use compressor::{CompressorConfig, SizeBoundedCompressor};
pub use crop::{centered_crop_rect, crop_stage, CropRect, CropTool, CropToolError, ImageCropTool};
pub use encoder::{EncodeError, SubmissionEncoder};
pub use handle::ImageHandle;
pub use pipeline::{PipelineError, PipelineState, SubmissionPipeline};
