//! Candidate file representation and local validation rules.
//!
//! Every acquisition channel produces a [`CandidateFile`]; [`validate`]
//! applies the local acceptance rules before the session adopts it.  The
//! accepted media types and the size ceiling mirror the captioning server's
//! own upload limits, so a file that passes here is never bounced by the
//! server for type or size reasons.

use thiserror::Error;

/// Largest accepted image payload in bytes (16 MiB).
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Media types the captioning workflow accepts.
///
/// `jpg` and `jpeg` extensions both map to `image/jpeg`.
pub const ACCEPTED_MEDIA_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/webp",
];

// ---------------------------------------------------------------------------
// AcquireError
// ---------------------------------------------------------------------------

/// Errors produced by the acquisition channels and validation step.
///
/// The `Display` strings are user-facing; where the captioning server defines
/// a message for the same condition, the same text is used here.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The candidate's declared media type is not in [`ACCEPTED_MEDIA_TYPES`].
    #[error("Invalid file type. Allowed types: png, jpg, jpeg, gif, bmp, webp")]
    InvalidType,

    /// The candidate exceeds [`MAX_IMAGE_BYTES`].
    #[error("File too large. Maximum size is 16MB")]
    TooLarge,

    /// A dropped item's media type does not begin with `image/`.
    #[error("Please drop an image file")]
    UnsupportedDrop,

    /// The file chosen in the picker (or dropped) could not be read.
    #[error("Could not read the selected file")]
    Read(#[source] std::io::Error),

    /// The adopted candidate's bytes could not be decoded as an image.
    #[error("Invalid or corrupted image file")]
    Decode,
}

// ---------------------------------------------------------------------------
// CandidateFile
// ---------------------------------------------------------------------------

/// A user-acquired, not-yet-submitted image awaiting validation / display.
///
/// Transient and in-memory only: a candidate exists until it is superseded by
/// a newer acquisition or the session is reset.  It is never persisted.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// File name shown to the user and forwarded to the server.
    pub name: String,
    /// Declared media type (e.g. `image/png`).
    pub media_type: String,
    /// Raw file payload.
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    /// Create a candidate from its parts.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Apply the local acceptance rules to a candidate.
///
/// The media-type check precedes the size check: a non-image of any size
/// reports [`AcquireError::InvalidType`], never [`AcquireError::TooLarge`].
pub fn validate(file: &CandidateFile) -> Result<(), AcquireError> {
    if !ACCEPTED_MEDIA_TYPES.contains(&file.media_type.as_str()) {
        return Err(AcquireError::InvalidType);
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AcquireError::TooLarge);
    }
    Ok(())
}

/// Derive a media type from a file name's extension.
///
/// Unknown or missing extensions map to `application/octet-stream`, which
/// [`validate`] subsequently rejects as [`AcquireError::InvalidType`].
pub fn media_type_for_name(name: &str) -> String {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(media_type: &str, len: usize) -> CandidateFile {
        CandidateFile::new("file.bin", media_type, vec![0u8; len])
    }

    #[test]
    fn all_accepted_types_pass_under_limit() {
        for media_type in ACCEPTED_MEDIA_TYPES {
            let file = candidate(media_type, 1024);
            assert!(validate(&file).is_ok(), "{media_type} should be accepted");
        }
    }

    #[test]
    fn unknown_type_rejected() {
        let file = candidate("text/plain", 1024);
        assert!(matches!(validate(&file), Err(AcquireError::InvalidType)));
    }

    /// A non-image must report `InvalidType` even when it is also oversized.
    #[test]
    fn type_check_precedes_size_check() {
        let file = candidate("application/pdf", MAX_IMAGE_BYTES + 1);
        assert!(matches!(validate(&file), Err(AcquireError::InvalidType)));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let at_limit = candidate("image/png", MAX_IMAGE_BYTES);
        assert!(validate(&at_limit).is_ok());

        let over_limit = candidate("image/png", MAX_IMAGE_BYTES + 1);
        assert!(matches!(validate(&over_limit), Err(AcquireError::TooLarge)));
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_name("photo.png"), "image/png");
        assert_eq!(media_type_for_name("photo.jpg"), "image/jpeg");
        assert_eq!(media_type_for_name("photo.jpeg"), "image/jpeg");
        assert_eq!(media_type_for_name("photo.gif"), "image/gif");
        assert_eq!(media_type_for_name("photo.bmp"), "image/bmp");
        assert_eq!(media_type_for_name("photo.webp"), "image/webp");
    }

    #[test]
    fn media_type_extension_is_case_insensitive() {
        assert_eq!(media_type_for_name("PHOTO.PNG"), "image/png");
        assert_eq!(media_type_for_name("Photo.JpG"), "image/jpeg");
    }

    #[test]
    fn media_type_unknown_or_missing_extension() {
        assert_eq!(media_type_for_name("notes.txt"), "application/octet-stream");
        assert_eq!(media_type_for_name("no-extension"), "application/octet-stream");
    }

    #[test]
    fn error_messages_match_server_texts() {
        assert_eq!(
            AcquireError::InvalidType.to_string(),
            "Invalid file type. Allowed types: png, jpg, jpeg, gif, bmp, webp"
        );
        assert_eq!(
            AcquireError::TooLarge.to_string(),
            "File too large. Maximum size is 16MB"
        );
        assert_eq!(
            AcquireError::Decode.to_string(),
            "Invalid or corrupted image file"
        );
    }
}
