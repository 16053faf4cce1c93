//! Image resize - decode, bound to a maximum dimension, re-encode
//!
//! Downscaling only: an image already inside the bounding box is re-encoded
//! at its original size. Aspect ratio is always preserved.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::{fs::read, path::Path};

/// Resize `source` so its longest side is at most `max_dimension` and save
/// the result as JPEG at `destination`.
pub fn resize_to_fit(source: &Path, destination: &Path, max_dimension: u32) -> Result<()> {
    let image = decode_image(source)?;
    let (width, height) = (image.width(), image.height());
    let (new_width, new_height) = bounded_width_height(width, height, max_dimension);

    let resized = if (new_width, new_height) == (width, height) {
        image
    } else {
        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    };

    resized
        .to_rgb8()
        .save_with_format(destination, ImageFormat::Jpeg)
        .with_context(|| format!("failed to save resized image to {:?}", destination))?;

    Ok(())
}

fn decode_image(path: &Path) -> Result<DynamicImage> {
    let file_in_memory =
        read(path).with_context(|| format!("failed to read file into memory: {:?}", path))?;
    image::load_from_memory(&file_in_memory)
        .with_context(|| format!("failed to decode image: {:?}", path))
}

/// Dimensions with the longest side clamped to `bound`, aspect preserved,
/// never upscaled.
pub fn bounded_width_height(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if width.max(height) <= bound {
        return (width, height);
    }
    if width >= height {
        (bound, (height * bound / width).max(1))
    } else {
        ((width * bound / height).max(1), bound)
    }
}
