//! Capture seam: the camera behind a single-shot async operation.
//!
//! Device APIs deliver frames through callbacks and ambient sessions; here a
//! capture is one awaitable operation that either resolves with a handle to a
//! freshly written temporary image file or fails with the reason no frame
//! materialized. Cancellation is a distinct outcome, not a generic error.

use std::io::{self, Cursor};
use std::path::PathBuf;

use async_trait::async_trait;
use image::GenericImageView;

use crate::handle::ImageHandle;

/// Why a capture produced no frame.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no camera device available")]
    DeviceUnavailable,

    #[error("camera permission denied")]
    Denied,

    #[error("capture cancelled")]
    Cancelled,

    #[error("capture I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A camera device, acquired for the duration of one attempt.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn capture(&self) -> Result<ImageHandle, CaptureError>;
}

/// Capture device that stages an existing image file as the captured frame.
/// This is the CLI's "camera": the photograph already exists on disk. A
/// missing or undecodable source means there is nothing to act as a device.
pub struct FileCapture {
    source: PathBuf,
}

impl FileCapture {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[async_trait]
impl CaptureDevice for FileCapture {
    async fn capture(&self) -> Result<ImageHandle, CaptureError> {
        if !self.source.exists() {
            return Err(CaptureError::DeviceUnavailable);
        }
        let data = tokio::fs::read(&self.source).await?;

        // Image decode is CPU-bound; run off the async pool.
        let (data, width, height) =
            tokio::task::spawn_blocking(move || -> Result<(Vec<u8>, u32, u32), CaptureError> {
                let reader = image::ImageReader::new(Cursor::new(&data))
                    .with_guessed_format()
                    .map_err(CaptureError::Io)?;
                let img = reader
                    .decode()
                    .map_err(|_| CaptureError::DeviceUnavailable)?;
                let (width, height) = img.dimensions();
                Ok((data, width, height))
            })
            .await
            .map_err(|e| CaptureError::Io(io::Error::other(e)))??;

        tracing::debug!(
            source = %self.source.display(),
            width,
            height,
            "staged capture frame"
        );
        Ok(ImageHandle::from_encoded_bytes(&data, width, height)?)
    }
}
