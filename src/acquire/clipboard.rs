//! Clipboard paste acquisition backed by the `arboard` crate.
//!
//! A short-lived [`arboard::Clipboard`] handle is created per read rather
//! than shared across calls, because `arboard::Clipboard` is not `Send` on
//! all platforms and the handle is cheap to create.
//!
//! Paste is a convenience channel: the paste shortcut fires for every
//! modifier+V press, most of which have nothing to do with images.  Every
//! failure path here is therefore a silent no-op — logged at debug level,
//! never surfaced to the user.

use std::io::Cursor;

use arboard::Clipboard;

use super::candidate::CandidateFile;

/// File name given to candidates synthesised from a clipboard paste.
pub const PASTED_IMAGE_NAME: &str = "pasted-image.png";

/// Read an image from the system clipboard, if one is present.
///
/// The clipboard's RGBA pixels are re-encoded as PNG so the candidate carries
/// a real file payload with type `image/png`.  Returns `None` when the
/// clipboard cannot be opened, holds no image, or the re-encode fails.
pub fn read_clipboard_image() -> Option<CandidateFile> {
    let mut clipboard = match Clipboard::new() {
        Ok(c) => c,
        Err(e) => {
            log::debug!("Clipboard unavailable: {e}");
            return None;
        }
    };

    let img = match clipboard.get_image() {
        Ok(img) => img,
        Err(e) => {
            log::debug!("No image on clipboard: {e}");
            return None;
        }
    };

    let (width, height) = (img.width as u32, img.height as u32);
    let Some(rgba) = image::RgbaImage::from_raw(width, height, img.bytes.into_owned()) else {
        log::debug!("Clipboard image dimensions do not match payload length");
        return None;
    };

    let mut png = Vec::new();
    if let Err(e) = image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
    {
        log::debug!("Failed to re-encode clipboard image as PNG: {e}");
        return None;
    }

    Some(CandidateFile::new(PASTED_IMAGE_NAME, "image/png", png))
}
