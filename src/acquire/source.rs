//! File-picker and drag-and-drop acquisition channels.
//!
//! Both channels produce a [`CandidateFile`] that still has to pass
//! [`validate`](super::validate) inside the session reducer; the only check
//! performed here is the drop channel's `image/` gate, which runs before the
//! dropped file's payload is read at all.

use std::path::Path;

use super::candidate::{media_type_for_name, AcquireError, CandidateFile};

/// Build a candidate from a file chosen in the native file dialog.
///
/// The media type is derived from the file extension; the picker's filter
/// already limits the visible files to the accepted image extensions, but a
/// user can still type an arbitrary path, so validation happens downstream.
pub fn from_picker(path: &Path) -> Result<CandidateFile, AcquireError> {
    let bytes = std::fs::read(path).map_err(AcquireError::Read)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let media_type = media_type_for_name(&name);
    Ok(CandidateFile::new(name, media_type, bytes))
}

/// Classify a dropped item before its payload is read.
///
/// Returns the item's effective media type — the declared MIME when the
/// platform provides one, otherwise derived from the file name.  A type that
/// does not begin with `image/` is an [`AcquireError::UnsupportedDrop`]: the
/// drop is refused up front and no file I/O happens for it.
pub fn classify_drop(name: &str, declared_mime: &str) -> Result<String, AcquireError> {
    let media_type = if declared_mime.is_empty() {
        media_type_for_name(name)
    } else {
        declared_mime.to_string()
    };

    if !media_type.starts_with("image/") {
        return Err(AcquireError::UnsupportedDrop);
    }
    Ok(media_type)
}
