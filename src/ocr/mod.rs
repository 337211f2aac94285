//! Menu text extraction.
//!
//! This module provides:
//! - Side-by-side compositing of the restaurant header and a day column
//! - The Gemini client behind the `VisionService` trait
//! - Per-day and per-week processing that writes `menu_<day>.md`

pub mod client;
pub mod composite;
pub mod extract;
pub mod prompt;

pub use client::{GeminiClient, VisionService};
pub use composite::composite;
pub use extract::extract_menu;

use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::Path;

use crate::config::MenuConfig;
use crate::log;
use crate::paths;
use crate::split::DAY_COUNT;

/// Runs the extraction pipeline against a service owned by the caller.
pub struct MenuExtractor<'a> {
    service: &'a dyn VisionService,
    config: &'a MenuConfig,
}

impl<'a> MenuExtractor<'a> {
    pub fn new(service: &'a dyn VisionService, config: &'a MenuConfig) -> Self {
        Self { service, config }
    }

    pub fn extract_menu(&self, image: &RgbImage, date_label: Option<&str>) -> Result<String> {
        extract_menu(self.service, &self.config.model, image, date_label)
    }

    /// Composites `0.png` with `<day>.png`, extracts the menu and writes `menu_<day>.md`.
    ///
    /// The date label is `date_label` when given, otherwise the configured name
    /// of the day. Nothing is written if compositing or extraction fails.
    pub fn process_day(
        &self,
        day: u32,
        output_dir: &Path,
        save_composite: bool,
        date_label: Option<&str>,
    ) -> Result<String> {
        let header_path = paths::header_image_path(output_dir);
        let day_path = paths::day_image_path(output_dir, day);
        let composite_path = save_composite.then(|| paths::composite_path(output_dir, day));

        let label = date_label
            .map(str::to_string)
            .unwrap_or_else(|| self.config.day_label(day));

        log(&format!("Processing {} (day {})", label, day));
        let combined = composite(&header_path, &day_path, composite_path.as_deref())?;
        let text = self.extract_menu(&combined, Some(&label))?;

        let result_path = paths::result_path(output_dir, day);
        fs::write(&result_path, &text)
            .with_context(|| format!("Failed to write {}", result_path.display()))?;
        log(&format!("Menu saved: {}", result_path.display()));

        Ok(text)
    }

    /// Processes Monday through Friday in order, stopping at the first failure.
    pub fn process_week(&self, output_dir: &Path, save_composite: bool) -> Result<Vec<String>> {
        (1..=DAY_COUNT as u32)
            .map(|day| self.process_day(day, output_dir, save_composite, None))
            .collect()
    }
}
