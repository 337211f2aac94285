//! Weekly menu splitting.
//!
//! This module provides:
//! - Fixed equal-width column boundaries
//! - Table-line detection with fallback to the fixed split
//! - Slicing and saving of the five day images

pub mod boundaries;
pub mod detect;

pub use boundaries::{BoundarySet, DAY_COUNT};
pub use detect::detect_boundaries;

use anyhow::{Context, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DetectionConfig;
use crate::error::open_image;
use crate::log;
use crate::paths;

/// How day images are named on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputNaming {
    /// `<label>.png`, e.g. `Monday.png`
    #[default]
    Label,
    /// `1.png` .. `5.png`, the names the extractor reads
    Index,
}

/// One sliced weekday column.
#[derive(Debug, Clone)]
pub struct DayImage {
    /// 0 = Monday .. 4 = Friday
    pub index: usize,
    pub label: String,
    pub image: DynamicImage,
    pub path: PathBuf,
}

/// Cuts full-height columns out of `img` at each boundary pair.
pub fn slice_columns(img: &DynamicImage, boundaries: &BoundarySet) -> Vec<DynamicImage> {
    let height = img.height();
    boundaries
        .segments()
        .map(|(start_x, end_x)| img.crop_imm(start_x, 0, end_x - start_x, height))
        .collect()
}

/// Splits the image into five equal-width day columns and saves them.
pub fn split_fixed(
    image_path: &Path,
    day_labels: &[String],
    output_dir: &Path,
    naming: OutputNaming,
) -> Result<Vec<DayImage>> {
    let img = open_image(image_path)?;
    let boundaries = BoundarySet::fixed(img.width());
    save_day_images(&img, &boundaries, day_labels, output_dir, naming)
}

/// Splits the image at detected table dividers and saves the five day columns.
///
/// Falls back to the fixed split when detection finds fewer than five columns.
pub fn split_by_detected_boundaries(
    image_path: &Path,
    day_labels: &[String],
    output_dir: &Path,
    naming: OutputNaming,
    detection: &DetectionConfig,
) -> Result<Vec<DayImage>> {
    let img = open_image(image_path)?;
    let boundaries = detect_boundaries(&img, detection).unwrap_or_else(|| {
        log("Not enough table boundaries detected, using fixed split.");
        BoundarySet::fixed(img.width())
    });
    save_day_images(&img, &boundaries, day_labels, output_dir, naming)
}

fn save_day_images(
    img: &DynamicImage,
    boundaries: &BoundarySet,
    day_labels: &[String],
    output_dir: &Path,
    naming: OutputNaming,
) -> Result<Vec<DayImage>> {
    log(&format!("Column boundaries: {:?}", boundaries.points()));
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut days = Vec::with_capacity(DAY_COUNT);
    for (index, image) in slice_columns(img, boundaries).into_iter().enumerate() {
        let label = day_labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string());
        let path = match naming {
            OutputNaming::Label => paths::labelled_image_path(output_dir, &label),
            OutputNaming::Index => paths::day_image_path(output_dir, index as u32 + 1),
        };

        image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        log(&format!("{} menu saved: {}", label, path.display()));

        days.push(DayImage {
            index,
            label,
            image,
            path,
        });
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MenuError;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn labels() -> Vec<String> {
        crate::config::MenuConfig::default().day_labels
    }

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 0]))
            .save(path)
            .unwrap();
    }

    fn column_widths(days: &[DayImage]) -> Vec<u32> {
        days.iter().map(|d| d.image.width()).collect()
    }

    #[test]
    fn test_slice_columns_preserves_pixels() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(50, 10, |x, y| {
            Rgb([x as u8, y as u8, 0])
        }));
        let columns = slice_columns(&img, &BoundarySet::fixed(50));

        assert_eq!(columns.len(), 5);
        let third = columns[2].to_rgb8();
        assert_eq!(third.dimensions(), (10, 10));
        assert_eq!(third.get_pixel(0, 3)[0], 20);
        assert_eq!(third.get_pixel(0, 3)[1], 3);
    }

    #[test]
    fn test_split_fixed_even_width() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("menu.png");
        write_image(&source, 1000, 200);
        let out = dir.path().join("output");

        let days = split_fixed(&source, &labels(), &out, OutputNaming::Label).unwrap();

        assert_eq!(column_widths(&days), vec![200, 200, 200, 200, 200]);
        assert!(days.iter().all(|d| d.image.height() == 200));
        assert!(out.join("Monday.png").exists());
        assert!(out.join("Friday.png").exists());
    }

    #[test]
    fn test_split_fixed_remainder_in_last_column() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("menu.png");
        write_image(&source, 1003, 200);

        let days = split_fixed(&source, &labels(), dir.path(), OutputNaming::Index).unwrap();

        assert_eq!(column_widths(&days), vec![200, 200, 200, 200, 203]);
        let saved = image::open(dir.path().join("5.png")).unwrap();
        assert_eq!((saved.width(), saved.height()), (203, 200));
    }

    #[test]
    fn test_split_missing_image_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("output");

        let err = split_fixed(
            &dir.path().join("missing.png"),
            &labels(),
            &out,
            OutputNaming::Label,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MenuError>(),
            Some(MenuError::Input { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_detected_split_falls_back_to_fixed() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("blank.png");
        RgbImage::from_pixel(1003, 300, Rgb([255, 255, 255]))
            .save(&source)
            .unwrap();

        let days = split_by_detected_boundaries(
            &source,
            &labels(),
            dir.path(),
            OutputNaming::Label,
            &DetectionConfig::default(),
        )
        .unwrap();

        assert_eq!(column_widths(&days), vec![200, 200, 200, 200, 203]);
    }

    #[test]
    fn test_detected_split_follows_dividers() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("table.png");
        // Uneven columns: a fixed split would give 200px each
        let dividers = [150u32, 420, 600, 850];
        RgbImage::from_fn(1000, 400, |x, _| {
            if dividers.iter().any(|&d| x >= d && x < d + 4) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
        .save(&source)
        .unwrap();

        let days = split_by_detected_boundaries(
            &source,
            &labels(),
            dir.path(),
            OutputNaming::Index,
            &DetectionConfig::default(),
        )
        .unwrap();

        let widths = column_widths(&days);
        assert_eq!(widths.len(), 5);
        assert_eq!(widths.iter().sum::<u32>(), 1000);
        assert!(widths[0].abs_diff(150) <= 6, "first column {}", widths[0]);
        assert!(widths[1].abs_diff(270) <= 6, "second column {}", widths[1]);
        assert!(dir.path().join("1.png").exists());
    }
}
