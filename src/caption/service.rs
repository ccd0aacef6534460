//! Core `CaptionService` trait and shared wire types.

use async_trait::async_trait;
use thiserror::Error;

use crate::acquire::CandidateFile;

/// Fallback message shown when the service fails without usable error text.
pub const GENERIC_FAILURE: &str = "Failed to generate caption. Please try again.";

// ---------------------------------------------------------------------------
// CaptionMode
// ---------------------------------------------------------------------------

/// Caption style requested from the service.
///
/// The wire contract supports both modes; the current UI only ever issues
/// [`CaptionMode::Detailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionMode {
    /// A short, single-sentence caption.
    Default,
    /// A longer, more descriptive caption.
    Detailed,
}

impl CaptionMode {
    /// Wire value sent in the multipart `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            CaptionMode::Default => "default",
            CaptionMode::Detailed => "detailed",
        }
    }
}

// ---------------------------------------------------------------------------
// Caption
// ---------------------------------------------------------------------------

/// A successful captioning result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// The caption text, rendered verbatim in the UI.
    pub text: String,
    /// File name echoed back by the server, when present.
    pub filename: Option<String>,
}

// ---------------------------------------------------------------------------
// CaptionError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting a caption.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The HTTP response could not be parsed as the expected JSON.
    #[error("failed to parse caption response: {0}")]
    Parse(String),

    /// The server reported a failure with its own error text.
    #[error("{0}")]
    Api(String),
}

impl From<reqwest::Error> for CaptionError {
    fn from(e: reqwest::Error) -> Self {
        CaptionError::Request(e.to_string())
    }
}

impl CaptionError {
    /// The message shown to the user for this failure.
    ///
    /// Server-provided text is preferred; transport and parse failures
    /// collapse to [`GENERIC_FAILURE`].
    pub fn display_message(&self) -> String {
        match self {
            CaptionError::Api(msg) => msg.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptionService trait
// ---------------------------------------------------------------------------

/// Async trait for captioning backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (wrapped in `Arc<dyn CaptionService>`).
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Submit `image` and return its caption in the requested `mode`.
    async fn caption(
        &self,
        image: &CandidateFile,
        mode: CaptionMode,
    ) -> Result<Caption, CaptionError>;

    /// Probe the service's health endpoint.
    async fn health(&self) -> Result<(), CaptionError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
