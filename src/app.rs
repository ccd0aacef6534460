//! Image caption floating widget — egui/eframe application.
//!
//! # Architecture
//!
//! [`CaptionApp`] is the top-level [`eframe::App`].  It owns the [`Session`]
//! and is deliberately thin: browser-style inputs (click, drop, paste,
//! Escape) are translated into [`SessionEvent`]s, the reducer decides what
//! happens, and any [`Command`] it emits is forwarded to the background
//! orchestrator over `command_tx`.  Completion events come back over
//! `event_rx` and go through the same reducer.
//!
//! # Widget states
//!
//! | State | Visual |
//! |-------|--------|
//! | `Idle` | Upload zone — "drop, browse, or paste" |
//! | `Previewing` | Image preview + "Generate detailed caption" |
//! | `Requesting` | Preview + spinner — request in flight |
//! | `Result` | Preview + caption text — green |
//! | `Error` | Preview + retry actions — banner shows the message |
//!
//! A single error banner sits under whatever panel is active and dismisses
//! itself after five seconds (see [`ErrorBanner`]).

use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::acquire;
use crate::config::AppConfig;
use crate::session::{Command, ErrorBanner, Session, SessionEvent, SessionState};

/// Accepted file extensions offered by the picker dialog.
const PICKER_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

// ---------------------------------------------------------------------------
// CaptionApp
// ---------------------------------------------------------------------------

/// eframe application — the floating image caption widget.
pub struct CaptionApp {
    /// The session state machine.  All mutations go through
    /// [`Session::apply`]; the UI only reads.
    session: Session,
    /// Auto-dismiss timing for the error banner.
    banner: ErrorBanner,

    // ── Preview texture cache ────────────────────────────────────────────
    /// GPU texture for the current preview, uploaded lazily.
    preview_texture: Option<egui::TextureHandle>,
    /// Session generation the cached texture belongs to.
    texture_generation: u64,

    // ── UI state ─────────────────────────────────────────────────────────
    /// Whether the settings panel is expanded.
    show_settings: bool,
    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,

    // ── Channels ─────────────────────────────────────────────────────────
    /// Send commands to the background session orchestrator.
    command_tx: mpsc::Sender<Command>,
    /// Sender cloned into acquisition worker threads (file reads, clipboard).
    event_tx: mpsc::Sender<SessionEvent>,
    /// Receive completion events from the orchestrator and the workers.
    event_rx: mpsc::Receiver<SessionEvent>,

    // ── Configuration ────────────────────────────────────────────────────
    /// Application configuration (read-only after startup).
    config: AppConfig,
}

impl CaptionApp {
    /// Create a new [`CaptionApp`].
    ///
    /// * `command_tx` — sender end of the orchestrator command channel.
    /// * `event_tx`   — sender end of the event channel (for worker threads).
    /// * `event_rx`   — receiver end of the event channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: mpsc::Sender<SessionEvent>,
        event_rx: mpsc::Receiver<SessionEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            session: Session::new(),
            banner: ErrorBanner::new(),
            preview_texture: None,
            texture_generation: 0,
            show_settings: false,
            spinner_phase: 0.0,
            command_tx,
            event_tx,
            event_rx,
            config,
        }
    }

    // ── Event plumbing ───────────────────────────────────────────────────

    /// Run one event through the reducer and forward any resulting command.
    fn apply(&mut self, event: SessionEvent) {
        if let Some(command) = self.session.apply(event) {
            if self.command_tx.try_send(command).is_err() {
                log::warn!("Command channel full; dropping command");
            }
        }
    }

    /// Drain all pending completion events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Let the banner observe the session; dismiss an expired error.
    fn poll_banner(&mut self) {
        if self.banner.poll(&self.session, Instant::now()) {
            self.apply(SessionEvent::ErrorExpired);
        }
    }

    // ── Input channels ───────────────────────────────────────────────────

    /// Keyboard shortcuts: paste-modifier+V acquires from the clipboard,
    /// Escape resets the session.
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.apply(SessionEvent::Reset);
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::V)) {
            self.spawn_clipboard_read();
        }
    }

    /// Read the clipboard off the UI thread.  No image (or no clipboard
    /// access) produces no event at all — paste is a silent convenience.
    fn spawn_clipboard_read(&self) {
        let event_tx = self.event_tx.clone();
        std::thread::spawn(move || {
            if let Some(candidate) = acquire::read_clipboard_image() {
                let _ = event_tx.blocking_send(SessionEvent::Acquire(candidate));
            }
        });
    }

    /// Accept files dropped anywhere on the widget, in any state.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.first() else {
            return;
        };

        let name = if !file.name.is_empty() {
            file.name.clone()
        } else {
            file.path
                .as_deref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("dropped-file")
                .to_string()
        };

        let media_type = match acquire::classify_drop(&name, &file.mime) {
            Ok(media_type) => media_type,
            Err(e) => {
                self.apply(SessionEvent::AcquireFailed {
                    message: e.to_string(),
                });
                return;
            }
        };

        // Load the payload off the UI thread, then funnel it through the
        // reducer like any other acquisition.
        let path = file.path.clone();
        let bytes = file.bytes.clone();
        let event_tx = self.event_tx.clone();
        std::thread::spawn(move || {
            let event = match (path, bytes) {
                (Some(path), _) => match std::fs::read(&path) {
                    Ok(bytes) => SessionEvent::Acquire(acquire::CandidateFile::new(
                        name, media_type, bytes,
                    )),
                    Err(e) => SessionEvent::AcquireFailed {
                        message: acquire::AcquireError::Read(e).to_string(),
                    },
                },
                (None, Some(bytes)) => SessionEvent::Acquire(acquire::CandidateFile::new(
                    name,
                    media_type,
                    bytes.to_vec(),
                )),
                (None, None) => return,
            };
            let _ = event_tx.blocking_send(event);
        });
    }

    /// Open the native file dialog and acquire the chosen file.
    fn open_picker(&self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &PICKER_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        let event_tx = self.event_tx.clone();
        std::thread::spawn(move || {
            let event = match acquire::from_picker(&path) {
                Ok(candidate) => SessionEvent::Acquire(candidate),
                Err(e) => SessionEvent::AcquireFailed {
                    message: e.to_string(),
                },
            };
            let _ = event_tx.blocking_send(event);
        });
    }

    // ── Preview texture ──────────────────────────────────────────────────

    /// Upload the decoded preview to a texture when it changes; drop the
    /// texture when the preview goes away.
    fn update_preview_texture(&mut self, ctx: &egui::Context) {
        match self.session.preview() {
            Some(preview)
                if self.preview_texture.is_none()
                    || self.texture_generation != self.session.generation() =>
            {
                let size = [preview.width as usize, preview.height as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &preview.rgba);
                self.preview_texture =
                    Some(ctx.load_texture("preview", color, egui::TextureOptions::LINEAR));
                self.texture_generation = self.session.generation();
            }
            None => self.preview_texture = None,
            _ => {}
        }
    }

    // ── Window sizing ────────────────────────────────────────────────────

    /// Resize the window to match the current session state.
    fn update_window_size(&self, ctx: &egui::Context) {
        let size = match self.session.state() {
            SessionState::Idle => egui::vec2(330.0, 200.0),
            SessionState::Previewing => egui::vec2(330.0, 320.0),
            SessionState::Requesting => egui::vec2(330.0, 320.0),
            SessionState::Result => egui::vec2(330.0, 410.0),
            SessionState::Error => egui::vec2(330.0, 330.0),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
    }

    // ── Custom title bar ─────────────────────────────────────────────────

    /// Draw the draggable title bar with status icon, title, and window
    /// controls (settings, minimise, close).
    fn draw_title_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            // Status icon
            let icon = match self.session.state() {
                SessionState::Idle => "  ",
                SessionState::Previewing => "o ",
                SessionState::Requesting => ". ",
                SessionState::Result => "OK",
                SessionState::Error => "! ",
            };
            ui.label(egui::RichText::new(icon).color(self.state_color()))
                .on_hover_text(self.session.state().label());

            // Draggable title area
            let title_resp = ui.label(
                egui::RichText::new("Image Caption")
                    .color(egui::Color32::from_rgb(200, 200, 200))
                    .size(13.0),
            );
            if title_resp.is_pointer_button_down_on() {
                if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
                    let delta = ctx.input(|i| i.pointer.delta());
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(
                        outer_rect.min + delta,
                    ));
                }
            }

            // Right-aligned window controls
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Close
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("x")
                                .color(egui::Color32::from_rgb(200, 100, 100))
                                .size(12.0),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                // Minimise
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("-")
                                .color(egui::Color32::from_rgb(150, 150, 150))
                                .size(12.0),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                }
                // Settings toggle
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("=")
                                .color(egui::Color32::from_rgb(150, 150, 150))
                                .size(12.0),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    self.show_settings = !self.show_settings;
                }
            });
        });
    }

    // ── State-specific panel renderers ───────────────────────────────────

    /// Render the Idle state panel: the upload zone.
    fn draw_idle(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(6.0);

        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 120.0),
            egui::Sense::click(),
        );

        let (fill, stroke) = if hovering_files || response.hovered() {
            (
                egui::Color32::from_rgb(45, 55, 45),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(80, 200, 120)),
            )
        } else {
            (
                egui::Color32::from_rgb(40, 40, 40),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 90, 90)),
            )
        };

        let painter = ui.painter();
        painter.rect(
            rect,
            egui::CornerRadius::same(6),
            fill,
            stroke,
            egui::StrokeKind::Inside,
        );
        painter.text(
            rect.center() - egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            "Drop an image here",
            egui::FontId::proportional(14.0),
            egui::Color32::from_rgb(180, 180, 180),
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 6.0),
            egui::Align2::CENTER_CENTER,
            "or click to browse",
            egui::FontId::proportional(12.0),
            egui::Color32::from_rgb(130, 130, 130),
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 26.0),
            egui::Align2::CENTER_CENTER,
            "paste works too (Ctrl/Cmd+V)",
            egui::FontId::proportional(11.0),
            egui::Color32::from_rgb(110, 110, 110),
        );

        if response.clicked() {
            self.open_picker();
        }
    }

    /// Render the Previewing state panel: preview + actions.
    fn draw_previewing(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        self.draw_preview(ui);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(
                    egui::RichText::new("Generate detailed caption").size(12.0),
                ))
                .clicked()
            {
                self.apply(SessionEvent::Generate);
            }
            if ui
                .add(egui::Button::new(egui::RichText::new("New image").size(12.0)))
                .clicked()
            {
                self.apply(SessionEvent::Reset);
            }
        });
    }

    /// Render the Requesting state panel: preview + spinner.
    ///
    /// The only action offered is reset — it abandons the in-flight request
    /// (its eventual response is discarded as stale).
    fn draw_requesting(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        self.draw_preview(ui);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{} Generating caption...", self.spinner_char()))
                    .color(egui::Color32::from_rgb(68, 136, 255))
                    .size(13.0),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new("New image").size(12.0)))
                    .clicked()
                {
                    self.apply(SessionEvent::Reset);
                }
            });
        });
    }

    /// Render the Result state panel: preview + caption + actions.
    fn draw_result(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(4.0);
        self.draw_preview(ui);
        ui.add_space(6.0);

        let caption = self.session.caption().unwrap_or_default().to_string();
        egui::ScrollArea::vertical().max_height(90.0).show(ui, |ui| {
            ui.label(
                egui::RichText::new(caption.as_str())
                    .color(egui::Color32::from_rgb(80, 200, 120))
                    .size(13.0),
            );
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(egui::RichText::new("Copy").size(11.0)))
                .clicked()
            {
                ctx.copy_text(caption.clone());
            }
            if ui
                .add(egui::Button::new(
                    egui::RichText::new("Regenerate").size(11.0),
                ))
                .clicked()
            {
                self.apply(SessionEvent::Generate);
            }
            if ui
                .add(egui::Button::new(egui::RichText::new("New image").size(11.0)))
                .clicked()
            {
                self.apply(SessionEvent::Reset);
            }
        });
    }

    /// Render the Error state panel: preview (if any) + retry actions.
    /// The failure message itself lives in the banner below.
    fn draw_error_state(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        self.draw_preview(ui);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if self.session.candidate().is_some()
                && ui
                    .add(egui::Button::new(
                        egui::RichText::new("Try again").size(12.0),
                    ))
                    .clicked()
            {
                self.apply(SessionEvent::Generate);
            }
            if ui
                .add(egui::Button::new(egui::RichText::new("New image").size(12.0)))
                .clicked()
            {
                self.apply(SessionEvent::Reset);
            }
        });
    }

    /// Render the settings panel (read-only overview).
    fn draw_settings(&self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Server:")
                .color(egui::Color32::from_rgb(180, 180, 180))
                .size(12.0),
        );
        ui.label(
            egui::RichText::new(format!("  {}", self.config.server.base_url))
                .color(egui::Color32::from_rgb(140, 140, 140))
                .size(11.0),
        );
        ui.add_space(2.0);
        ui.label(
            egui::RichText::new(format!(
                "  Always on top: {}",
                self.config.ui.always_on_top
            ))
            .color(egui::Color32::from_rgb(140, 140, 140))
            .size(11.0),
        );
        ui.label(
            egui::RichText::new("  Shortcuts: Ctrl/Cmd+V paste, Esc reset")
                .color(egui::Color32::from_rgb(140, 140, 140))
                .size(11.0),
        );
    }

    // ── Preview helper ────────────────────────────────────────────────────

    /// Draw the preview image scaled to fit, or a placeholder while the
    /// background decode is still running.
    fn draw_preview(&mut self, ui: &mut egui::Ui) {
        match &self.preview_texture {
            Some(texture) => {
                ui.centered_and_justified(|ui| {
                    ui.add(
                        egui::Image::new(texture)
                            .max_size(egui::vec2(ui.available_width(), 170.0))
                            .corner_radius(egui::CornerRadius::same(4)),
                    );
                });
            }
            None => {
                ui.allocate_ui(egui::vec2(ui.available_width(), 170.0), |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} Loading preview...",
                                self.spinner_char()
                            ))
                            .color(egui::Color32::from_rgb(130, 130, 130))
                            .size(12.0),
                        );
                    });
                });
            }
        }
    }

    /// Draw the single error banner when a message is displayed.
    fn draw_error_banner(&self, ui: &mut egui::Ui) {
        if let Some(message) = self.session.error_message() {
            ui.add_space(4.0);
            ui.separator();
            ui.label(
                egui::RichText::new(message)
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(12.0),
            );
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }

    /// Primary accent colour for the current state (used in the title bar icon).
    fn state_color(&self) -> egui::Color32 {
        match self.session.state() {
            SessionState::Idle => egui::Color32::from_rgb(100, 100, 100),
            SessionState::Previewing => egui::Color32::from_rgb(68, 136, 255),
            SessionState::Requesting => egui::Color32::from_rgb(68, 136, 255),
            SessionState::Result => egui::Color32::from_rgb(80, 200, 120),
            SessionState::Error => egui::Color32::from_rgb(255, 136, 68),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for CaptionApp {
    /// Called every frame by eframe.  Polls channels, advances timers, then
    /// renders the widget.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Poll non-blocking channels and the banner deadline ------------
        self.poll_events();
        self.poll_banner();

        // --- Input channels that work in any state -------------------------
        self.handle_keyboard(ctx);
        self.handle_dropped_files(ctx);

        // --- Keep the preview texture in sync ------------------------------
        self.update_preview_texture(ctx);

        // --- Advance spinner animation -------------------------------------
        self.spinner_phase += 0.08;
        if self.spinner_phase >= 4.0 {
            self.spinner_phase = 0.0;
        }

        // --- Schedule repaints ---------------------------------------------
        // Acquisition workers and the orchestrator deliver events over
        // channels that are only drained here, so a repaint must always be
        // pending; animated states and the banner deadline tick faster.
        let repaint = match self.session.state() {
            SessionState::Requesting => Duration::from_millis(66),
            SessionState::Previewing if self.session.preview().is_none() => {
                Duration::from_millis(66)
            }
            _ if self.session.error_message().is_some() => Duration::from_millis(200),
            _ => Duration::from_millis(500),
        };
        ctx.request_repaint_after(repaint);

        // --- Resize window to match state ---------------------------------
        self.update_window_size(ctx);

        // --- Dark transparent background frame ----------------------------
        let frame = egui::Frame::new()
            .fill(egui::Color32::from_rgba_premultiplied(30, 30, 30, 220))
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(8));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.draw_title_bar(ui, ctx);

            if self.show_settings {
                ui.separator();
                self.draw_settings(ui);
                return;
            }

            ui.separator();

            match self.session.state() {
                SessionState::Idle => self.draw_idle(ui, ctx),
                SessionState::Previewing => self.draw_previewing(ui),
                SessionState::Requesting => self.draw_requesting(ui),
                SessionState::Result => {
                    let ctx_clone = ctx.clone();
                    self.draw_result(ui, &ctx_clone);
                }
                SessionState::Error => self.draw_error_state(ui),
            }

            self.draw_error_banner(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Image caption widget closing");
    }
}
