//! Crop stage: center-crop to a target aspect ratio, best-effort.

use std::io::Cursor;

use async_trait::async_trait;
use image::GenericImageView;

use crate::compressor::encode_jpeg;
use crate::handle::ImageHandle;

/// Quality for re-encoding the cropped frame. The size budget is enforced
/// later by the compressor, so this stays near-lossless.
const CROP_ENCODE_QUALITY: u8 = 90;

/// A crop rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centered crop rectangle for a target width/height ratio.
///
/// If the source is wider than the target, width shrinks to
/// `height × ratio` with equal margins left and right; otherwise height
/// shrinks to `width / ratio` with equal margins top and bottom. No
/// distortion, no letterboxing.
pub fn centered_crop_rect(src_width: u32, src_height: u32, target_aspect: f64) -> CropRect {
    let src_aspect = f64::from(src_width) / f64::from(src_height);
    if src_aspect > target_aspect {
        let width = (f64::from(src_height) * target_aspect).round() as u32;
        let width = width.clamp(1, src_width);
        CropRect {
            x: (src_width - width) / 2,
            y: 0,
            width,
            height: src_height,
        }
    } else {
        let height = (f64::from(src_width) / target_aspect).round() as u32;
        let height = height.clamp(1, src_height);
        CropRect {
            x: 0,
            y: (src_height - height) / 2,
            width: src_width,
            height,
        }
    }
}

/// Why the crop tool produced nothing. The stage treats both variants the
/// same way: carry the uncropped frame forward.
#[derive(Debug, thiserror::Error)]
pub enum CropToolError {
    #[error("crop cancelled")]
    Cancelled,

    #[error("crop tool failed: {0}")]
    Tool(String),
}

/// The external image-editing capability that performs the pixel work.
#[async_trait]
pub trait CropTool: Send + Sync {
    async fn crop(
        &self,
        handle: &ImageHandle,
        rect: CropRect,
    ) -> Result<ImageHandle, CropToolError>;
}

/// Built-in crop tool backed by the `image` crate.
pub struct ImageCropTool;

#[async_trait]
impl CropTool for ImageCropTool {
    async fn crop(
        &self,
        handle: &ImageHandle,
        rect: CropRect,
    ) -> Result<ImageHandle, CropToolError> {
        let data = tokio::fs::read(handle.path())
            .await
            .map_err(|e| CropToolError::Tool(e.to_string()))?;

        let encoded = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, CropToolError> {
            let img = image::ImageReader::new(Cursor::new(&data))
                .with_guessed_format()
                .map_err(|e| CropToolError::Tool(e.to_string()))?
                .decode()
                .map_err(|e| CropToolError::Tool(e.to_string()))?;
            let (width, height) = img.dimensions();
            if rect.x + rect.width > width || rect.y + rect.height > height {
                return Err(CropToolError::Tool(format!(
                    "crop rectangle {}x{}+{}+{} exceeds source {}x{}",
                    rect.width, rect.height, rect.x, rect.y, width, height
                )));
            }
            let cropped = img.crop_imm(rect.x, rect.y, rect.width, rect.height);
            encode_jpeg(&cropped, CROP_ENCODE_QUALITY).map_err(|e| CropToolError::Tool(e.to_string()))
        })
        .await
        .map_err(|e| CropToolError::Tool(e.to_string()))??;

        ImageHandle::from_encoded_bytes(&encoded, rect.width, rect.height)
            .map_err(|e| CropToolError::Tool(e.to_string()))
    }
}

/// Run the crop stage. Cropping is best-effort: when the tool cancels or
/// fails, the uncropped input is carried forward instead of failing the
/// attempt.
pub async fn crop_stage(
    handle: ImageHandle,
    target_aspect: f64,
    tool: &dyn CropTool,
) -> ImageHandle {
    let rect = centered_crop_rect(handle.width(), handle.height(), target_aspect);
    match tool.crop(&handle, rect).await {
        Ok(cropped) => {
            tracing::debug!(
                src_width = handle.width(),
                src_height = handle.height(),
                width = cropped.width(),
                height = cropped.height(),
                "cropped frame to target aspect"
            );
            cropped
        }
        Err(err) => {
            tracing::warn!(error = %err, "crop unavailable, keeping uncropped frame");
            handle
        }
    }
}
