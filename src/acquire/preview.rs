//! Preview decoding — candidate bytes to a displayable RGBA image.

use super::candidate::AcquireError;

/// A decoded preview: RGBA8 pixels plus dimensions.
///
/// Deliberately UI-framework-free; the app layer uploads this to an egui
/// texture when it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixel data, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Decode `bytes` into a [`PreviewImage`].
///
/// Intended to run on the blocking thread pool — decoding a multi-megabyte
/// JPEG can take tens of milliseconds.
pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, AcquireError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        log::debug!("Preview decode failed: {e}");
        AcquireError::Decode
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreviewImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Encode a small solid-colour PNG entirely in memory.
    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .expect("png encode");
        out
    }

    #[test]
    fn decodes_png_with_expected_dimensions() {
        let preview = decode_preview(&tiny_png(4, 3)).expect("decode");
        assert_eq!(preview.width, 4);
        assert_eq!(preview.height, 3);
        assert_eq!(preview.rgba.len(), 4 * 3 * 4);
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let result = decode_preview(b"definitely not an image");
        assert!(matches!(result, Err(AcquireError::Decode)));
    }
}
