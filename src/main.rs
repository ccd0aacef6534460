//! Application entry point — Image-to-Caption client.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the captioning service client ([`HttpCaptionService`]) from
//!    config and probe its health endpoint (non-fatal, logged only).
//! 5. Create session channels (`command`, `event`).
//! 6. Spawn the session orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;

use image_to_caption::{
    app::CaptionApp,
    caption::{CaptionService, HttpCaptionService},
    config::AppConfig,
    session::{Command, SessionEvent, SessionOrchestrator},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_decorations(false)
        .with_transparent(true)
        .with_inner_size([330.0, 200.0])
        .with_min_inner_size([300.0, 150.0])
        .with_resizable(false);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Image caption client starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — caption requests + preview decode)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Captioning service client + startup health probe (non-fatal)
    let service: Arc<dyn CaptionService> = Arc::new(HttpCaptionService::from_config(&config.server));
    {
        let service = Arc::clone(&service);
        let base_url = config.server.base_url.clone();
        rt.spawn(async move {
            match service.health().await {
                Ok(()) => log::info!("Captioning service reachable at {base_url}"),
                Err(e) => log::warn!(
                    "Captioning service not reachable at {base_url} ({e}); \
                     caption requests will fail until it is up"
                ),
            }
        });
    }

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(32);

    // 6. Spawn the session orchestrator onto the tokio runtime
    rt.spawn(SessionOrchestrator::new(Arc::clone(&service), event_tx.clone()).run(command_rx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = CaptionApp::new(command_tx, event_tx, event_rx, config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "Image Caption",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
