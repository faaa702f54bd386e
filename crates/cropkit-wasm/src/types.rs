//! WASM-compatible wrapper for crop results.

use cropkit_core::CroppedImage;
use wasm_bindgen::prelude::*;

/// An encoded crop result for JavaScript.
///
/// # Memory Management
///
/// The encoded bytes stay in WASM memory. `bytes()` and `data_url()` copy
/// them out on each call, so grab the form you need once.
#[wasm_bindgen]
pub struct JsCroppedImage {
    inner: CroppedImage,
}

#[wasm_bindgen]
impl JsCroppedImage {
    /// Output width in pixels, equal to the crop region width
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Output height in pixels, equal to the crop region height
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// MIME type of the encoded bytes, e.g. `image/jpeg`
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.inner.mime().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Encoded image bytes as a `Uint8Array`.
    ///
    /// Wrap in a `Blob` with [`Self::mime`] to upload as a file.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// The result as a base64 `data:` URL, ready to store in form state.
    pub fn data_url(&self) -> String {
        self.inner.to_data_url()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional. wasm-bindgen's finalizer releases it otherwise.
    pub fn free(self) {}
}

impl JsCroppedImage {
    pub(crate) fn from_cropped(inner: CroppedImage) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropkit_core::OutputFormat;

    fn sample() -> JsCroppedImage {
        JsCroppedImage::from_cropped(CroppedImage {
            width: 4,
            height: 2,
            format: OutputFormat::Png,
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        })
    }

    #[test]
    fn test_dimensions_and_mime() {
        let img = sample();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);
        assert_eq!(img.mime(), "image/png");
        assert_eq!(img.byte_length(), 4);
    }

    #[test]
    fn test_bytes_are_copied_out() {
        let img = sample();
        assert_eq!(img.bytes(), vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_data_url() {
        assert_eq!(sample().data_url(), "data:image/png;base64,iVBORw==");
    }
}
