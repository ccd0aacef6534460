//! Image acquisition — input channels and local validation.
//!
//! This module provides:
//! * [`CandidateFile`] — an acquired, not-yet-submitted image.
//! * [`validate`] — the local acceptance rules (media type, byte size).
//! * [`from_picker`] — the native file-dialog channel.
//! * [`classify_drop`] — media-type gate for the drag-and-drop channel.
//! * [`read_clipboard_image`] — the clipboard paste channel.
//! * [`decode_preview`] / [`PreviewImage`] — background preview decoding.
//! * [`AcquireError`] — error variants for all acquisition operations.
//!
//! All three channels funnel into the same validate-and-adopt step inside
//! the session reducer; nothing here mutates session state directly.

pub mod candidate;
pub mod clipboard;
pub mod preview;
pub mod source;

pub use candidate::{
    media_type_for_name, validate, AcquireError, CandidateFile, ACCEPTED_MEDIA_TYPES,
    MAX_IMAGE_BYTES,
};
pub use clipboard::{read_clipboard_image, PASTED_IMAGE_NAME};
pub use preview::{decode_preview, PreviewImage};
pub use source::{classify_drop, from_picker};
