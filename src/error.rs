//! Error kinds surfaced by the splitter and the extractor.
//!
//! Everything else travels as `anyhow::Error`; callers that need to tell the
//! kinds apart use `downcast_ref::<MenuError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    /// Missing or undecodable image.
    #[error("Cannot load image {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Upload or generation call failed.
    #[error("Extraction service error: {0}")]
    ExternalService(String),

    /// Missing credential or invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MenuError {
    pub fn input(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        MenuError::Input {
            path: path.into(),
            source,
        }
    }

    pub fn service(msg: impl Into<String>) -> Self {
        MenuError::ExternalService(msg.into())
    }
}

/// Opens an image, mapping decode and I/O failures to `MenuError::Input`.
pub fn open_image(path: &std::path::Path) -> Result<image::DynamicImage, MenuError> {
    image::open(path).map_err(|e| MenuError::input(path, e))
}
