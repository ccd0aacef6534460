//! Session orchestrator — executes reducer commands on the tokio runtime.
//!
//! The reducer never blocks: it emits [`Command`]s, and this orchestrator
//! serves each one on its own task, so a hung caption request never delays a
//! preview decode.  Generation tags travel with every command and come back
//! on every event; the reducer performs the staleness comparison itself.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::acquire::decode_preview;
use crate::caption::CaptionService;

use super::state::{Command, RequestOutcome, SessionEvent};

/// Runs commands in the background and feeds completion events back to the UI.
pub struct SessionOrchestrator {
    service: Arc<dyn CaptionService>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl SessionOrchestrator {
    pub fn new(service: Arc<dyn CaptionService>, event_tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { service, event_tx }
    }

    /// Consume commands until the channel closes (the UI dropped its sender).
    pub async fn run(self, mut command_rx: mpsc::Receiver<Command>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                Command::DecodePreview { generation, bytes } => {
                    let event_tx = self.event_tx.clone();
                    tokio::spawn(async move {
                        let decoded =
                            tokio::task::spawn_blocking(move || decode_preview(&bytes)).await;

                        let event = match decoded {
                            Ok(Ok(image)) => SessionEvent::PreviewReady { generation, image },
                            Ok(Err(e)) => SessionEvent::PreviewFailed {
                                generation,
                                message: e.to_string(),
                            },
                            Err(e) => SessionEvent::PreviewFailed {
                                generation,
                                message: format!("Internal error: {e}"),
                            },
                        };
                        let _ = event_tx.send(event).await;
                    });
                }

                Command::IssueRequest {
                    generation,
                    candidate,
                    mode,
                } => {
                    log::info!(
                        "Issuing caption request for {} ({} bytes, mode {})",
                        candidate.name,
                        candidate.bytes.len(),
                        mode.as_str()
                    );

                    let service = Arc::clone(&self.service);
                    let event_tx = self.event_tx.clone();
                    tokio::spawn(async move {
                        let outcome = match service.caption(&candidate, mode).await {
                            Ok(caption) => {
                                log::info!("Caption received ({} chars)", caption.text.len());
                                RequestOutcome::Success {
                                    caption: caption.text,
                                }
                            }
                            Err(e) => {
                                log::warn!("Caption request failed: {e}");
                                RequestOutcome::Failure {
                                    message: e.display_message(),
                                }
                            }
                        };
                        let _ = event_tx
                            .send(SessionEvent::Response {
                                generation,
                                outcome,
                            })
                            .await;
                    });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Cursor;

    use crate::acquire::CandidateFile;
    use crate::caption::{Caption, CaptionError, CaptionMode, GENERIC_FAILURE};

    // ── Test doubles ─────────────────────────────────────────────────────

    /// Always captions with a fixed string.
    struct AlwaysOk(&'static str);

    #[async_trait]
    impl CaptionService for AlwaysOk {
        async fn caption(
            &self,
            _image: &CandidateFile,
            _mode: CaptionMode,
        ) -> Result<Caption, CaptionError> {
            Ok(Caption {
                text: self.0.to_string(),
                filename: None,
            })
        }

        async fn health(&self) -> Result<(), CaptionError> {
            Ok(())
        }
    }

    /// Always fails with a transport error.
    struct AlwaysErr;

    #[async_trait]
    impl CaptionService for AlwaysErr {
        async fn caption(
            &self,
            _image: &CandidateFile,
            _mode: CaptionMode,
        ) -> Result<Caption, CaptionError> {
            Err(CaptionError::Request("connection refused".into()))
        }

        async fn health(&self) -> Result<(), CaptionError> {
            Err(CaptionError::Request("connection refused".into()))
        }
    }

    fn spawn_orchestrator(
        service: Arc<dyn CaptionService>,
    ) -> (mpsc::Sender<Command>, mpsc::Receiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(32);
        tokio::spawn(SessionOrchestrator::new(service, event_tx).run(command_rx));
        (command_tx, event_rx)
    }

    fn candidate() -> CandidateFile {
        CandidateFile::new("photo.png", "image/png", vec![0u8; 8])
    }

    // ── Tests ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_request_yields_success_outcome() {
        let (command_tx, mut event_rx) = spawn_orchestrator(Arc::new(AlwaysOk("a dog")));

        command_tx
            .send(Command::IssueRequest {
                generation: 7,
                candidate: candidate(),
                mode: CaptionMode::Detailed,
            })
            .await
            .expect("send");

        let event = event_rx.recv().await.expect("event");
        let SessionEvent::Response {
            generation,
            outcome: RequestOutcome::Success { caption },
        } = event
        else {
            panic!("expected success response, got {event:?}");
        };
        assert_eq!(generation, 7);
        assert_eq!(caption, "a dog");
    }

    #[tokio::test]
    async fn transport_failure_yields_fallback_message() {
        let (command_tx, mut event_rx) = spawn_orchestrator(Arc::new(AlwaysErr));

        command_tx
            .send(Command::IssueRequest {
                generation: 3,
                candidate: candidate(),
                mode: CaptionMode::Detailed,
            })
            .await
            .expect("send");

        let event = event_rx.recv().await.expect("event");
        let SessionEvent::Response {
            generation,
            outcome: RequestOutcome::Failure { message },
        } = event
        else {
            panic!("expected failure response, got {event:?}");
        };
        assert_eq!(generation, 3);
        assert_eq!(message, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn decode_command_produces_preview_ready() {
        let (command_tx, mut event_rx) = spawn_orchestrator(Arc::new(AlwaysOk("unused")));

        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 0, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode");

        command_tx
            .send(Command::DecodePreview {
                generation: 5,
                bytes: png,
            })
            .await
            .expect("send");

        let event = event_rx.recv().await.expect("event");
        let SessionEvent::PreviewReady { generation, image } = event else {
            panic!("expected PreviewReady, got {event:?}");
        };
        assert_eq!(generation, 5);
        assert_eq!((image.width, image.height), (3, 2));
    }

    #[tokio::test]
    async fn undecodable_bytes_produce_preview_failed() {
        let (command_tx, mut event_rx) = spawn_orchestrator(Arc::new(AlwaysOk("unused")));

        command_tx
            .send(Command::DecodePreview {
                generation: 9,
                bytes: b"not an image".to_vec(),
            })
            .await
            .expect("send");

        let event = event_rx.recv().await.expect("event");
        let SessionEvent::PreviewFailed {
            generation,
            message,
        } = event
        else {
            panic!("expected PreviewFailed, got {event:?}");
        };
        assert_eq!(generation, 9);
        assert_eq!(message, "Invalid or corrupted image file");
    }
}
