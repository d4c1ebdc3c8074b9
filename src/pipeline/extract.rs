use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::Palette;
use crate::pipeline::validate::ImageFile;

pub const EXTRACT_PATH: &str = "/api/extract";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field the service reads the upload from.
pub const IMAGE_FIELD: &str = "image";

/// The single failure the controller ever sees from an extraction.
///
/// `detail` is for logs only; users get a generic "try again".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to extract colors: {detail}")]
pub struct ExtractionFailed {
    pub detail: String,
}

impl ExtractionFailed {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Request/response boundary to the color extraction service.
pub trait ExtractionClient {
    /// Send one image and wait for its palette. No retries.
    fn extract(&self, file: &ImageFile) -> Result<Palette, ExtractionFailed>;
}

/// Body of a non-success answer from the service.
#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

/// Answer to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

/// Talks to the extraction service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExtractionClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpExtractionClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("chromapick/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn extract_url(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_PATH)
    }

    /// Probe the service's health endpoint.
    pub fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let status = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("health check failed: {url}"))?
            .into_json::<HealthStatus>()
            .context("health endpoint returned an unexpected body")?;
        Ok(status)
    }
}

impl ExtractionClient for HttpExtractionClient {
    fn extract(&self, file: &ImageFile) -> Result<Palette, ExtractionFailed> {
        let boundary = new_boundary();
        let body = multipart_body(&boundary, IMAGE_FIELD, file);
        let url = self.extract_url();
        debug!(%url, bytes = file.bytes.len(), "sending image for extraction");

        let response = self
            .agent
            .post(&url)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body);

        match response {
            Ok(resp) => resp
                .into_json::<Palette>()
                .map_err(|e| ExtractionFailed::new(format!("unreadable palette: {e}"))),
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<ServiceError>(&body).ok())
                    .map(|e| e.error)
                    .unwrap_or_default();
                warn!(status = code, %message, "extraction service rejected the image");
                Err(ExtractionFailed::new(format!("status {code}")))
            }
            Err(e) => Err(ExtractionFailed::new(e.to_string())),
        }
    }
}

fn new_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("chromapick-{nanos:032x}")
}

/// Encode `file` as the only part of a `multipart/form-data` body.
pub(crate) fn multipart_body(boundary: &str, field: &str, file: &ImageFile) -> Vec<u8> {
    let filename: String = file
        .name
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();

    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.media_type).as_bytes());
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
