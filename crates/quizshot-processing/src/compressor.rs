//! Size-bounded compressor: monotonic quality back-off with an early-exit
//! size predicate and graceful degradation on exhaustion.
//!
//! Every pass clamps the raster to fixed bounds, re-encodes the previous
//! pass's output at a decremented JPEG quality, and measures the result.
//! The first pass under budget wins. Reaching the quality floor returns the
//! last-produced handle (the budget is best-effort, not a hard contract);
//! an encode failure returns the most recent known-good handle.

use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

use crate::handle::ImageHandle;

/// Knobs for one compression run.
#[derive(Clone, Copy, Debug)]
pub struct CompressorConfig {
    pub byte_budget: usize,
    pub start_quality: u8,
    pub quality_step: u8,
    pub quality_floor: u8,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            byte_budget: 1024 * 1024,
            start_quality: 85,
            quality_step: 10,
            quality_floor: 30,
            max_width: 1280,
            max_height: 1700,
        }
    }
}

impl From<&quizshot_core::Config> for CompressorConfig {
    fn from(config: &quizshot_core::Config) -> Self {
        Self {
            byte_budget: config.byte_budget,
            start_quality: config.quality_start,
            quality_step: config.quality_step,
            quality_floor: config.quality_floor,
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }
}

/// One pass of the back-off loop; exists only to decide whether to continue.
#[derive(Clone, Copy, Debug)]
struct CompressionAttempt {
    quality: u8,
    result_size_bytes: usize,
}

pub struct SizeBoundedCompressor;

impl SizeBoundedCompressor {
    /// Compress toward `config.byte_budget`. Always yields a handle; never
    /// encodes below `config.quality_floor`.
    pub async fn compress(handle: ImageHandle, config: &CompressorConfig) -> ImageHandle {
        let config = *config;
        let mut current = handle;
        let mut quality = config.start_quality.max(config.quality_floor);

        loop {
            let (bytes, width, height) = match Self::encode_pass(&current, quality, &config).await
            {
                Ok(out) => out,
                Err(err) => {
                    tracing::warn!(
                        quality,
                        error = %err,
                        "encode pass failed, keeping last known-good image"
                    );
                    return current;
                }
            };

            let attempt = CompressionAttempt {
                quality,
                result_size_bytes: bytes.len(),
            };
            tracing::debug!(
                quality = attempt.quality,
                size_bytes = attempt.result_size_bytes,
                budget = config.byte_budget,
                "compression attempt"
            );

            current = match ImageHandle::from_encoded_bytes(&bytes, width, height) {
                Ok(next) => next,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to stage encoded image, keeping last known-good");
                    return current;
                }
            };

            if attempt.result_size_bytes <= config.byte_budget {
                return current;
            }
            if quality <= config.quality_floor {
                tracing::debug!(
                    quality,
                    size_bytes = attempt.result_size_bytes,
                    "quality floor reached, returning best-effort result"
                );
                return current;
            }
            quality = quality
                .saturating_sub(config.quality_step)
                .max(config.quality_floor);
        }
    }

    async fn encode_pass(
        handle: &ImageHandle,
        quality: u8,
        config: &CompressorConfig,
    ) -> Result<(Vec<u8>, u32, u32)> {
        let data = tokio::fs::read(handle.path()).await?;
        let max_width = config.max_width;
        let max_height = config.max_height;

        // Decode + encode are CPU-bound; run off the async pool.
        let out = tokio::task::spawn_blocking(move || -> Result<(Vec<u8>, u32, u32)> {
            let img = image::ImageReader::new(Cursor::new(&data))
                .with_guessed_format()?
                .decode()?;
            let img = bound_raster(img, max_width, max_height);
            let (width, height) = img.dimensions();
            let bytes = encode_jpeg(&img, quality)?;
            Ok((bytes, width, height))
        })
        .await??;

        Ok(out)
    }
}

/// Clamp the raster to the configured bounds, preserving aspect ratio.
/// Images already inside the bounds pass through untouched.
fn bound_raster(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_width && height <= max_height {
        return img;
    }
    img.resize(max_width, max_height, image::imageops::FilterType::Lanczos3)
}

/// Encode to JPEG at an explicit quality using mozjpeg.
pub(crate) fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(jpeg_data)
}
