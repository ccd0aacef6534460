//! Configuration module for the image caption client.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the captioning
//! server and the widget UI, `AppPaths` for cross-platform directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ServerConfig, UiConfig};
