use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;
use tempfile::NamedTempFile;

use super::client::VisionService;
use super::prompt::{menu_prompt, today_label};
use crate::log;

const COMPOSITE_MIME: &str = "image/png";

/// Composite written to a temporary PNG for the lifetime of an upload.
///
/// The file is removed when the guard drops; removal failures are logged only.
struct TempImage {
    file: Option<NamedTempFile>,
}

impl TempImage {
    fn write(img: &RgbImage) -> Result<Self> {
        let file = NamedTempFile::with_suffix(".png").context("Failed to create temp file")?;
        img.save(file.path())
            .with_context(|| format!("Failed to write {}", file.path().display()))?;
        Ok(Self { file: Some(file) })
    }

    fn path(&self) -> &Path {
        // Only None after drop
        self.file
            .as_ref()
            .map(|f| f.path())
            .unwrap_or_else(|| Path::new(""))
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                log(&format!(
                    "Could not remove temp image {}: {}",
                    path.display(),
                    e
                ));
            }
        }
    }
}

/// Uploads the composite and asks the model for the day's lunch menu.
///
/// `date_label` defaults to today's date. Service failures are returned as
/// `MenuError::ExternalService` without retrying.
pub fn extract_menu(
    service: &dyn VisionService,
    model: &str,
    image: &RgbImage,
    date_label: Option<&str>,
) -> Result<String> {
    let date = date_label.map(str::to_string).unwrap_or_else(today_label);

    let temp = TempImage::write(image)?;
    let file = service.upload(temp.path(), COMPOSITE_MIME)?;
    let text = service.generate(model, &file, &menu_prompt(&date))?;

    log(&format!("Menu extracted for {} ({} chars)", date, text.len()));
    Ok(text)
}
