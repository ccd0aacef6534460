//! Session state machine — the reducer behind the captioning workflow.
//!
//! # Transitions
//!
//! ```text
//! Idle ──valid acquisition──▶ Previewing
//! Previewing ──valid acquisition──▶ Previewing   (candidate replaced)
//! Previewing ──Generate──▶ Requesting            (one request issued)
//! Requesting ──Response: success──▶ Result
//! Requesting ──Response: failure──▶ Error
//! any state ──Reset──▶ Idle
//! ```
//!
//! Rejected acquisitions and `Generate` without a candidate only set the
//! error message; state and candidate are untouched.
//!
//! # Staleness
//!
//! Every adoption and every reset bumps a generation counter.  Commands carry
//! the generation they were issued under, and the corresponding completion
//! events carry it back; the reducer discards any completion whose generation
//! no longer matches.  A caption response is additionally required to find
//! the session still in `Requesting` — so a response that arrives after a
//! reset, or after a newer image superseded its candidate, is a no-op.

use crate::acquire::{validate, CandidateFile, PreviewImage};
use crate::caption::CaptionMode;

/// Error shown when caption generation is attempted with no candidate.
const NO_FILE_SELECTED: &str = "Please select an image first";

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of the captioning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image acquired yet (or the session was reset).
    Idle,
    /// A validated candidate is adopted and its preview is shown.
    Previewing,
    /// A caption request is in flight.  At most one exists at a time.
    Requesting,
    /// The caption arrived and is being displayed.
    Result,
    /// The caption request failed.
    Error,
}

impl SessionState {
    /// `true` while a caption request is in flight — the UI shows the
    /// loading indicator exactly when this holds.
    pub fn is_requesting(self) -> bool {
        matches!(self, SessionState::Requesting)
    }

    /// A short human-readable label for the title-bar status.
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Previewing => "Ready",
            SessionState::Requesting => "Generating",
            SessionState::Result => "Done",
            SessionState::Error => "Error",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

// ---------------------------------------------------------------------------
// Events and commands
// ---------------------------------------------------------------------------

/// Outcome of a resolved caption request.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// The server produced a caption.
    Success { caption: String },
    /// Transport failure, non-success status, or a falsy `success` flag.
    /// `message` is already user-facing.
    Failure { message: String },
}

/// Everything that can happen to a session, from any input channel.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// An acquisition channel produced a candidate (picker, drop, paste).
    Acquire(CandidateFile),
    /// An acquisition channel failed before producing a candidate —
    /// a non-image drop or an unreadable file.  `message` is user-facing.
    AcquireFailed { message: String },
    /// The user asked for a caption.
    Generate,
    /// Background preview decode finished.
    PreviewReady { generation: u64, image: PreviewImage },
    /// Background preview decode failed.  `message` is user-facing.
    PreviewFailed { generation: u64, message: String },
    /// The caption request resolved.
    Response {
        generation: u64,
        outcome: RequestOutcome,
    },
    /// The error banner's dismissal deadline passed.
    ErrorExpired,
    /// Explicit reset — the "New image" action or the Escape key.
    Reset,
}

/// Side effects the reducer asks the orchestrator to perform.
#[derive(Debug, Clone)]
pub enum Command {
    /// Decode the adopted candidate's bytes into a preview off the UI thread.
    DecodePreview { generation: u64, bytes: Vec<u8> },
    /// Issue the captioning request.
    IssueRequest {
        generation: u64,
        candidate: CandidateFile,
        mode: CaptionMode,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single unit of UI state for one captioning workflow.
///
/// Owned by the app; mutated exclusively through [`Session::apply`].
/// Invariants:
/// * at most one candidate is live — a new valid acquisition replaces it;
/// * `state == Requesting` implies exactly one request is in flight;
/// * every resolution path leaves `Requesting`, so the loading indicator
///   can never stick.
pub struct Session {
    state: SessionState,
    candidate: Option<CandidateFile>,
    preview: Option<PreviewImage>,
    caption: Option<String>,
    error_message: Option<String>,
    /// Bumped on every shown error; the banner re-arms its dismissal
    /// deadline when this advances.
    error_seq: u64,
    /// Bumped on every adoption and reset; stale completions are detected
    /// by comparing against it.
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            candidate: None,
            preview: None,
            caption: None,
            error_message: None,
            error_seq: 0,
            generation: 0,
        }
    }

    // ── Read accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn candidate(&self) -> Option<&CandidateFile> {
        self.candidate.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_seq(&self) -> u64 {
        self.error_seq
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Reducer ──────────────────────────────────────────────────────────

    /// Apply one event and return the side effect to run, if any.
    pub fn apply(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::Acquire(file) => self.acquire(file),

            SessionEvent::AcquireFailed { message } => {
                self.show_error(message);
                None
            }

            SessionEvent::Generate => self.generate(),

            SessionEvent::PreviewReady { generation, image } => {
                if generation != self.generation {
                    log::debug!(
                        "Stale preview discarded (generation {generation} != {})",
                        self.generation
                    );
                    return None;
                }
                self.preview = Some(image);
                None
            }

            SessionEvent::PreviewFailed {
                generation,
                message,
            } => {
                if generation != self.generation {
                    log::debug!(
                        "Stale preview failure discarded (generation {generation} != {})",
                        self.generation
                    );
                    return None;
                }
                // The adopted bytes are not a displayable image; drop them.
                if self.state == SessionState::Previewing {
                    self.candidate = None;
                    self.preview = None;
                    self.state = SessionState::Idle;
                }
                self.show_error(message);
                None
            }

            SessionEvent::Response {
                generation,
                outcome,
            } => self.resolve(generation, outcome),

            SessionEvent::ErrorExpired => {
                self.error_message = None;
                None
            }

            SessionEvent::Reset => {
                self.candidate = None;
                self.preview = None;
                self.caption = None;
                self.error_message = None;
                self.generation += 1;
                self.state = SessionState::Idle;
                None
            }
        }
    }

    // ── Transition helpers ───────────────────────────────────────────────

    /// Validate-and-adopt: the shared funnel for all acquisition channels.
    ///
    /// A rejection only shows the error; the session (including any existing
    /// candidate) is otherwise untouched.  Adoption replaces the candidate,
    /// clears the previous caption/error/preview, bumps the generation, and
    /// schedules the preview decode.
    fn acquire(&mut self, file: CandidateFile) -> Option<Command> {
        if let Err(e) = validate(&file) {
            log::info!("Rejected {} ({}): {e}", file.name, file.media_type);
            self.show_error(e.to_string());
            return None;
        }

        log::info!("Adopted {} ({}, {} bytes)", file.name, file.media_type, file.bytes.len());
        let bytes = file.bytes.clone();
        self.candidate = Some(file);
        self.preview = None;
        self.caption = None;
        self.error_message = None;
        self.generation += 1;
        self.state = SessionState::Previewing;

        Some(Command::DecodePreview {
            generation: self.generation,
            bytes,
        })
    }

    /// Handle the "generate detailed caption" action.
    ///
    /// The mode is a fixed parameter of this action: the wire contract knows
    /// both `default` and `detailed`, but only `Detailed` is wired to the UI.
    fn generate(&mut self) -> Option<Command> {
        if self.state == SessionState::Requesting {
            // One in-flight request at a time.
            return None;
        }

        let Some(candidate) = self.candidate.clone() else {
            self.show_error(NO_FILE_SELECTED.to_string());
            return None;
        };

        self.caption = None;
        self.error_message = None;
        self.state = SessionState::Requesting;

        Some(Command::IssueRequest {
            generation: self.generation,
            candidate,
            mode: CaptionMode::Detailed,
        })
    }

    /// Apply a caption response, or discard it when stale.
    ///
    /// A response counts only when its generation matches **and** the session
    /// is still `Requesting`: a reset or a superseding acquisition bumps the
    /// generation, which turns the eventual resolution into a no-op.
    fn resolve(&mut self, generation: u64, outcome: RequestOutcome) -> Option<Command> {
        if generation != self.generation || self.state != SessionState::Requesting {
            log::debug!(
                "Stale caption response discarded (generation {generation}, state {:?})",
                self.state
            );
            return None;
        }

        match outcome {
            RequestOutcome::Success { caption } => {
                self.caption = Some(caption);
                self.state = SessionState::Result;
            }
            RequestOutcome::Failure { message } => {
                self.state = SessionState::Error;
                self.show_error(message);
            }
        }
        None
    }

    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.error_seq += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
