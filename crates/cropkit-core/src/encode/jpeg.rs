//! JPEG encoding for cropped output.
//!
//! Uses the `image` crate's baseline JPEG encoder. JPEG has no alpha
//! channel, which is why the canvas fill colour ends up visible in the
//! output wherever the crop reaches past the rotated source.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::format::validate;
use super::EncodeError;
use crate::decode::DecodedImage;

/// Encode an RGB image to JPEG bytes.
///
/// `quality` is clamped to 1..=100.
///
/// # Quality Guidelines
///
/// * 90-100: Close to the source, good for cover art that gets rescaled later
/// * 80-90: Fine for banners and icons
/// * Below 60: Visible block artifacts
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(128);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&DecodedImage::filled(100, 100, [128, 128, 128]), 90).unwrap();

        // SOI ... EOI
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = DecodedImage::filled(10, 10, [128, 128, 128]);
        assert!(encode_jpeg(&img, 0).is_ok());
        assert!(encode_jpeg(&img, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        let img = gradient(64, 64);
        let low = encode_jpeg(&img, 10).unwrap();
        let high = encode_jpeg(&img, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_encode_jpeg_rejects_mismatched_buffer() {
        let img = DecodedImage {
            width: 100,
            height: 100,
            pixels: vec![128u8; 101 * 100 * 3],
        };
        assert!(matches!(
            encode_jpeg(&img, 90),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_zero_height() {
        let img = DecodedImage {
            width: 100,
            height: 0,
            pixels: vec![],
        };
        assert!(matches!(
            encode_jpeg(&img, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_single_pixel() {
        let jpeg = encode_jpeg(&DecodedImage::filled(1, 1, [255, 0, 0]), 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}
