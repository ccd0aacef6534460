//! Error banner auto-dismiss timing.
//!
//! The banner observes the session once per frame.  Whenever the session's
//! error sequence advances (a new message was shown), the dismissal deadline
//! is re-armed 5 seconds out — replacing any earlier deadline, so an older
//! message's timer can never clear a message shown after it.  When the
//! deadline passes, [`ErrorBanner::poll`] reports it once and the caller
//! applies [`SessionEvent::ErrorExpired`](super::SessionEvent::ErrorExpired).
//!
//! All methods take the current [`Instant`] as a parameter, which keeps the
//! replacement race testable without sleeping.

use std::time::{Duration, Instant};

use super::state::Session;

/// How long an error message stays visible before auto-dismissal.
pub const DISMISS_AFTER: Duration = Duration::from_millis(5000);

/// Owns the error display's single, cancellable dismissal deadline.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    /// The error sequence the current deadline was armed for.
    armed_seq: u64,
    /// Pending dismissal deadline; `None` when no error is displayed.
    deadline: Option<Instant>,
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the session at `now`.
    ///
    /// Returns `true` exactly once per displayed message, when its deadline
    /// has passed — the signal to dismiss.  Arming, re-arming, and disarming
    /// all happen here:
    /// * no visible error → the deadline is dropped;
    /// * a newer error than the armed one → the deadline is replaced;
    /// * the armed deadline passed → report expiry and drop the deadline.
    pub fn poll(&mut self, session: &Session, now: Instant) -> bool {
        if session.error_message().is_none() {
            self.deadline = None;
            return false;
        }

        if session.error_seq() != self.armed_seq {
            self.armed_seq = session.error_seq();
            self.deadline = Some(now + DISMISS_AFTER);
            return false;
        }

        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionEvent;

    fn error(session: &mut Session, message: &str) {
        session.apply(SessionEvent::AcquireFailed {
            message: message.into(),
        });
    }

    #[test]
    fn no_error_means_no_expiry() {
        let mut banner = ErrorBanner::new();
        let session = Session::new();
        assert!(!banner.poll(&session, Instant::now()));
    }

    #[test]
    fn fires_once_after_five_seconds() {
        let mut banner = ErrorBanner::new();
        let mut session = Session::new();
        let t0 = Instant::now();

        error(&mut session, "oops");
        assert!(!banner.poll(&session, t0)); // arms
        assert!(!banner.poll(&session, t0 + Duration::from_millis(4999)));
        assert!(banner.poll(&session, t0 + Duration::from_millis(5000)));

        // Reported once; the caller clears the message.
        session.apply(SessionEvent::ErrorExpired);
        assert!(!banner.poll(&session, t0 + Duration::from_secs(10)));
    }

    /// Error A, then error B inside A's 5-second window: when A's original
    /// deadline passes, B must still be visible — only B's own deadline
    /// dismisses it.
    #[test]
    fn newer_message_outlives_older_timer() {
        let mut banner = ErrorBanner::new();
        let mut session = Session::new();
        let t0 = Instant::now();

        error(&mut session, "error A");
        assert!(!banner.poll(&session, t0)); // arm for A

        error(&mut session, "error B");
        let t_b = t0 + Duration::from_secs(2);
        assert!(!banner.poll(&session, t_b)); // re-arm for B

        // A's deadline (t0 + 5 s) passes; B's (t_b + 5 s) has not.
        assert!(!banner.poll(&session, t0 + Duration::from_secs(5)));
        assert_eq!(session.error_message(), Some("error B"));

        assert!(banner.poll(&session, t_b + Duration::from_secs(5)));
    }

    #[test]
    fn clearing_the_error_disarms_the_deadline() {
        let mut banner = ErrorBanner::new();
        let mut session = Session::new();
        let t0 = Instant::now();

        error(&mut session, "oops");
        banner.poll(&session, t0);

        session.apply(SessionEvent::Reset);
        assert!(!banner.poll(&session, t0 + Duration::from_secs(6)));
    }

    /// A message shown after a reset must get a fresh full window even if an
    /// identical deadline had been armed before the reset.
    #[test]
    fn rearms_for_errors_shown_after_a_clear() {
        let mut banner = ErrorBanner::new();
        let mut session = Session::new();
        let t0 = Instant::now();

        error(&mut session, "first");
        banner.poll(&session, t0);
        session.apply(SessionEvent::Reset);
        banner.poll(&session, t0 + Duration::from_secs(1));

        error(&mut session, "second");
        let t1 = t0 + Duration::from_secs(4);
        assert!(!banner.poll(&session, t1)); // arms fresh
        assert!(!banner.poll(&session, t1 + Duration::from_millis(4999)));
        assert!(banner.poll(&session, t1 + Duration::from_millis(5000)));
    }
}
