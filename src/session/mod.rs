//! Session module — the upload-and-caption state machine.
//!
//! This module provides:
//! * [`Session`] — the single unit of UI state, mutated only via
//!   [`Session::apply`], a reducer over [`SessionEvent`]s.
//! * [`SessionState`] — `Idle → Previewing → Requesting → Result | Error`.
//! * [`Command`] — side effects the reducer asks the orchestrator to run.
//! * [`ErrorBanner`] — 5-second auto-dismiss timing for the error display.
//! * [`SessionOrchestrator`] — executes commands on the tokio runtime and
//!   feeds the results back as events.
//!
//! The UI layer is a thin adapter: it translates clicks, drops, pastes, and
//! keypresses into events and renders whatever the session says.  All state
//! decisions live in the reducer, which keeps them unit-testable without a
//! window or a network.

pub mod banner;
pub mod runner;
pub mod state;

pub use banner::ErrorBanner;
pub use runner::SessionOrchestrator;
pub use state::{Command, RequestOutcome, Session, SessionEvent, SessionState};
