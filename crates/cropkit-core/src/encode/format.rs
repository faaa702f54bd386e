//! Output format selection and shared encoder validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{encode_jpeg, encode_png};
use crate::decode::DecodedImage;

/// JPEG quality used when none is configured.
///
/// Matches what a browser canvas uses for `toDataURL("image/jpeg")` without
/// an explicit quality argument (0.92).
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Errors that can occur while encoding a cropped raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Compressed format for the cropped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG at the given quality (1-100).
    Jpeg {
        #[serde(default = "default_quality")]
        quality: u8,
    },
    /// Lossless PNG.
    Png,
}

fn default_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputFormat {
    /// MIME type used in `data:` URLs and upload requests.
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Encode an image in the requested format.
pub fn encode(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg { quality } => encode_jpeg(image, quality),
        OutputFormat::Png => encode_png(image),
    }
}

/// Check that an image is something an encoder can accept.
pub(super) fn validate(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.pixel_count() * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_jpeg_92() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg { quality: 92 });
    }

    #[test]
    fn test_mime() {
        assert_eq!(OutputFormat::default().mime(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime(), "image/png");
    }

    #[test]
    fn test_encode_dispatches_on_format() {
        let img = DecodedImage::filled(8, 8, [10, 20, 30]);

        let jpeg = encode(&img, OutputFormat::default()).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode(&img, OutputFormat::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let img = DecodedImage {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        assert!(matches!(
            validate(&img),
            Err(EncodeError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_validate_rejects_short_buffer() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0; 10 * 9 * 3],
        };
        assert!(matches!(
            validate(&img),
            Err(EncodeError::InvalidPixelData {
                expected: 300,
                actual: 270
            })
        ));
    }

    #[test]
    fn test_format_deserializes_from_tagged_json() {
        let jpeg: OutputFormat = serde_json::from_str(r#"{"type":"jpeg","quality":80}"#).unwrap();
        assert_eq!(jpeg, OutputFormat::Jpeg { quality: 80 });

        let jpeg: OutputFormat = serde_json::from_str(r#"{"type":"jpeg"}"#).unwrap();
        assert_eq!(jpeg, OutputFormat::default());

        let png: OutputFormat = serde_json::from_str(r#"{"type":"png"}"#).unwrap();
        assert_eq!(png, OutputFormat::Png);
    }
}
