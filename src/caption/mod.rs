//! Captioning service client.
//!
//! This module provides:
//! * [`CaptionService`] — async trait implemented by all captioning backends.
//! * [`HttpCaptionService`] — reqwest client for the captioning server.
//! * [`CaptionMode`] — `default` / `detailed` caption styles.
//! * [`Caption`] — a successful captioning result.
//! * [`CaptionError`] — error variants for caption operations.
//!
//! The server is an external collaborator reached over HTTP: a multipart
//! `POST /upload` with an `image` part and a `type` field, answering
//! `{ "success": true, "caption": … }` or an error body.

pub mod http;
pub mod service;

pub use http::HttpCaptionService;
pub use service::{Caption, CaptionError, CaptionMode, CaptionService, GENERIC_FAILURE};
