//! `HttpCaptionService` — reqwest client for the captioning server.
//!
//! Wire contract:
//! * `POST {base_url}/upload` — multipart form with an `image` part
//!   (bytes + file name + MIME) and a `type` text field.
//! * Success body: `{ "success": true, "caption": "…", "filename": "…" }`.
//! * Failure: non-2xx status and/or `{ "error": "…" }` / `success` falsy.
//! * `GET {base_url}/health` — liveness probe.

use async_trait::async_trait;
use serde::Deserialize;

use crate::acquire::CandidateFile;
use crate::config::ServerConfig;

use super::service::{Caption, CaptionError, CaptionMode, CaptionService, GENERIC_FAILURE};

// ---------------------------------------------------------------------------
// Wire body
// ---------------------------------------------------------------------------

/// JSON body returned by `POST /upload` — covers both the success and the
/// failure shape (`success` absent counts as falsy).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    caption: Option<String>,
    filename: Option<String>,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// HttpCaptionService
// ---------------------------------------------------------------------------

/// Talks to the captioning server configured in [`ServerConfig`].
pub struct HttpCaptionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCaptionService {
    /// Build a service client from application config.
    ///
    /// The HTTP client is built **without** a request timeout: a hung caption
    /// request stays pending until the user resets the session.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Interpret a response's HTTP status and body per the upload contract.
    ///
    /// Failure is "status not OK" OR "`success` falsy"; the body's `error`
    /// text wins when present, otherwise [`GENERIC_FAILURE`] is reported.
    fn interpret(status_ok: bool, body: &str) -> Result<Caption, CaptionError> {
        let parsed: Option<UploadResponse> = serde_json::from_str(body).ok();

        match parsed {
            Some(resp) if status_ok && resp.success => {
                let text = resp
                    .caption
                    .ok_or_else(|| CaptionError::Parse("missing caption field".into()))?;
                Ok(Caption {
                    text,
                    filename: resp.filename,
                })
            }
            Some(resp) => Err(CaptionError::Api(
                resp.error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
            None if status_ok => {
                Err(CaptionError::Parse("response body is not valid JSON".into()))
            }
            None => Err(CaptionError::Api(GENERIC_FAILURE.to_string())),
        }
    }
}

#[async_trait]
impl CaptionService for HttpCaptionService {
    async fn caption(
        &self,
        image: &CandidateFile,
        mode: CaptionMode,
    ) -> Result<Caption, CaptionError> {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(&image.media_type)
            .map_err(|e| CaptionError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("type", mode.as_str());

        let url = format!("{}/upload", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;

        let status_ok = response.status().is_success();
        let body = response.text().await?;
        Self::interpret(status_ok, &body)
    }

    async fn health(&self) -> Result<(), CaptionError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CaptionError::Api(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
