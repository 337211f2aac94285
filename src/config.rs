//! Configuration for splitting and extraction.
//!
//! Loads settings from a JSON file at startup. Every field has a default, so a
//! partial file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MenuError;

const CONFIG_FILE_NAME: &str = "menu_ocr.json";

/// Parameters of the table-boundary detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Canny low gradient threshold
    pub canny_low: f32,
    /// Canny high gradient threshold
    pub canny_high: f32,
    /// Minimum Hough accumulator votes for a candidate line
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator
    pub suppression_radius: u32,
    /// Minimum segment length as a fraction of image height
    pub min_line_ratio: f32,
    /// Largest gap (pixels) bridged between collinear edge pieces
    pub max_line_gap: u32,
    /// Largest horizontal displacement (pixels) of a near-vertical segment
    pub vertical_tolerance: u32,
    /// Minimum boundary spacing as a fraction of image width
    pub merge_ratio: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            vote_threshold: 100,
            suppression_radius: 8,
            min_line_ratio: 0.6,
            max_line_gap: 20,
            vertical_tolerance: 20,
            merge_ratio: 0.1,
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Weekly menu image used by `split` when no path is given
    pub source_image: PathBuf,
    /// Directory holding day images, composites and menu text
    pub output_dir: PathBuf,
    /// Labels for Monday..Friday, used for file names and prompts
    pub day_labels: Vec<String>,
    /// Model identifier passed to generateContent
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Base URL of the Generative Language API
    pub api_base_url: String,
    /// Timeout for each upload/generation request (seconds)
    pub request_timeout_secs: u64,
    pub detection: DetectionConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            source_image: PathBuf::from("menu.png"),
            output_dir: PathBuf::from("./output"),
            day_labels: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout_secs: 120,
            detection: DetectionConfig::default(),
        }
    }
}

impl MenuConfig {
    /// Label for a 1-based day index, or `Day <n>` outside Monday..Friday.
    pub fn day_label(&self, day: u32) -> String {
        day.checked_sub(1)
            .and_then(|i| self.day_labels.get(i as usize))
            .cloned()
            .unwrap_or_else(|| format!("Day {}", day))
    }

    /// Checks values the splitter and extractor rely on.
    pub fn validate(&self) -> Result<(), MenuError> {
        if self.day_labels.len() != 5 {
            return Err(MenuError::Config(format!(
                "day_labels must name exactly 5 days, got {}",
                self.day_labels.len()
            )));
        }
        let d = &self.detection;
        for (name, value) in [
            ("min_line_ratio", d.min_line_ratio),
            ("merge_ratio", d.merge_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(MenuError::Config(format!(
                    "detection.{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, MenuError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(MenuError::Config(format!(
                "Set the {} environment variable",
                self.api_key_env
            ))),
        }
    }
}

/// Candidate config locations, most specific first.
fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    candidates.push(crate::paths::get_exe_dir().join(CONFIG_FILE_NAME));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("menu-ocr").join("config.json"));
    }
    candidates
}

/// Loads configuration from the first existing candidate or returns defaults.
///
/// An explicitly requested file that does not exist is reported but does not
/// stop the search.
pub fn load_config(explicit: Option<&Path>) -> MenuConfig {
    for config_path in config_candidates(explicit) {
        if !config_path.exists() {
            if explicit == Some(config_path.as_path()) {
                crate::log(&format!("Config not found: {}", config_path.display()));
            }
            continue;
        }

        crate::log(&format!("Loading config from: {}", config_path.display()));
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => return config,
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                ));
            }
        }
        return MenuConfig::default();
    }

    crate::log("No config file found. Using default config.");
    MenuConfig::default()
}
