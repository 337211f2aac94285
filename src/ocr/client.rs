//! Client for the Gemini Generative Language API.
//!
//! Only two calls are needed: a resumable Files API upload of the composite
//! image, and a single `generateContent` request referencing that file.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::MenuConfig;
use crate::error::MenuError;
use crate::log;

/// Reference to a file stored by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: FileRef,
}

/// Image-understanding service used by the extractor.
pub trait VisionService {
    /// Uploads a local file and returns the service's reference to it.
    fn upload(&self, path: &Path, mime_type: &str) -> Result<FileRef, MenuError>;

    /// Runs one generation request over an uploaded file and returns the text.
    fn generate(&self, model: &str, file: &FileRef, prompt: &str) -> Result<String, MenuError>;
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, MenuError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MenuError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from the configured endpoint, timeout and API key variable.
    pub fn from_config(config: &MenuConfig) -> Result<Self, MenuError> {
        Self::new(
            config.api_key()?,
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// Turns a non-success response into an `ExternalService` error.
fn check_status(
    resp: reqwest::blocking::Response,
    action: &str,
) -> Result<reqwest::blocking::Response, MenuError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(MenuError::service(format!(
        "{} failed ({}): {}",
        action, status, body
    )))
}

impl VisionService for GeminiClient {
    fn upload(&self, path: &Path, mime_type: &str) -> Result<FileRef, MenuError> {
        let bytes = fs::read(path)
            .map_err(|e| MenuError::service(format!("Cannot read {}: {}", path.display(), e)))?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "menu.png".to_string());

        // Start a resumable upload session
        let start = self
            .http
            .post(self.upload_url())
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .map_err(|e| MenuError::service(format!("Upload request failed: {}", e)))?;
        let start = check_status(start, "Upload start")?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| MenuError::service("Upload session URL missing from response"))?
            .to_string();

        // Send the bytes and finalize in one request
        let finish = self
            .http
            .post(&session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .map_err(|e| MenuError::service(format!("Upload transfer failed: {}", e)))?;
        let finish = check_status(finish, "Upload")?;

        let uploaded: UploadResponse = finish
            .json()
            .map_err(|e| MenuError::service(format!("Invalid upload response: {}", e)))?;

        log(&format!("Uploaded {} as {}", display_name, uploaded.file.name));
        Ok(uploaded.file)
    }

    fn generate(&self, model: &str, file: &FileRef, prompt: &str) -> Result<String, MenuError> {
        let resp = self
            .http
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&generate_request_body(file, prompt))
            .send()
            .map_err(|e| MenuError::service(format!("Generation request failed: {}", e)))?;
        let resp = check_status(resp, "Generation")?;

        let json: Value = resp
            .json()
            .map_err(|e| MenuError::service(format!("Invalid generation response: {}", e)))?;
        response_text(&json)
    }
}

/// Request body carrying the uploaded image followed by the prompt.
pub fn generate_request_body(file: &FileRef, prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "file_data": { "mime_type": file.mime_type, "file_uri": file.uri } },
                { "text": prompt }
            ]
        }]
    })
}

/// Concatenates the text parts of the first candidate.
pub fn response_text(json: &Value) -> Result<String, MenuError> {
    let parts = json["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates");
            MenuError::service(format!("Empty generation response: {}", reason))
        })?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(MenuError::service("Generation response contained no text"));
    }
    Ok(text)
}
