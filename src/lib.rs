//! Image-to-Caption — native desktop client for an image captioning service.
//!
//! The application is a small floating widget: the user drops, picks, or
//! pastes an image, the client validates it locally, submits it to the
//! captioning server, and displays the caption (or an error).
//!
//! # Modules
//!
//! * [`acquire`] — the three acquisition channels (file picker, drag-and-drop,
//!   clipboard paste), local validation rules, and preview decoding.
//! * [`session`] — the session state machine (reducer), error banner timing,
//!   and the background orchestrator that executes its commands.
//! * [`caption`] — the [`caption::CaptionService`] trait and the reqwest
//!   implementation talking to the captioning server.
//! * [`config`] — TOML settings and platform paths.
//! * [`app`] — the egui/eframe surface; a thin adapter that translates UI
//!   events into [`session::SessionEvent`]s.

pub mod acquire;
pub mod app;
pub mod caption;
pub mod config;
pub mod session;
