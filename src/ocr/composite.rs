use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::path::Path;

use crate::error::open_image;
use crate::log;

/// Rescales an image to `target_height`, keeping its aspect ratio.
///
/// The new width is `floor(width * target_height / height)`, never below 1.
/// Images already at the target height are only converted to RGB.
pub fn fit_height(img: &DynamicImage, target_height: u32) -> RgbImage {
    let rgb = img.to_rgb8();
    if rgb.height() == target_height {
        return rgb;
    }

    let new_width = (rgb.width() as u64 * target_height as u64 / rgb.height() as u64).max(1) as u32;
    imageops::resize(&rgb, new_width, target_height, FilterType::Lanczos3)
}

/// Places the header and day images side by side at the taller of the two heights.
pub fn composite_images(header: &DynamicImage, day: &DynamicImage) -> RgbImage {
    let max_height = header.height().max(day.height());
    let header = fit_height(header, max_height);
    let day = fit_height(day, max_height);

    let mut combined = RgbImage::new(header.width() + day.width(), max_height);
    imageops::replace(&mut combined, &header, 0, 0);
    imageops::replace(&mut combined, &day, header.width() as i64, 0);
    combined
}

/// Loads both images, composites them, and optionally saves the result.
pub fn composite(
    header_path: &Path,
    day_path: &Path,
    output_path: Option<&Path>,
) -> Result<RgbImage> {
    let header = open_image(header_path)?;
    let day = open_image(day_path)?;
    let combined = composite_images(&header, &day);

    if let Some(path) = output_path {
        combined
            .save(path)
            .with_context(|| format!("Failed to save composite {}", path.display()))?;
        log(&format!("Composite image saved: {}", path.display()));
    }

    Ok(combined)
}
