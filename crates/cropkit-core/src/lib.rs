//! Cropkit Core - rotate-and-crop for uploaded images
//!
//! This crate turns a source image, a crop rectangle and a rotation angle
//! into a new encoded image, the way a cropping widget's preview shows it:
//! the source is rotated about its center onto a canvas sized to its rotated
//! bounding box, and the crop rectangle is cut from that canvas.
//!
//! ```ignore
//! use cropkit_core::{CropRegion, CropTransform};
//!
//! let out = CropTransform::default().crop_bytes(&upload, &CropRegion::new(0.0, 0.0, 512.0, 512.0), 90.0)?;
//! form.cover = out.to_data_url();
//! ```

pub mod data_url;
pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod source;
pub mod transform;

pub use data_url::{file_to_data_url, parse_data_url, to_data_url, DataUrl};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
#[cfg(not(target_arch = "wasm32"))]
pub use pipeline::crop;
pub use pipeline::{CropError, CropOptions, CropTransform, CroppedImage};
pub use source::ImageSource;
pub use transform::{compute_rotated_bounds, CropRegion, InterpolationFilter, RegionError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CropOptions::default();
        assert_eq!(options.format, OutputFormat::Jpeg { quality: DEFAULT_JPEG_QUALITY });
        assert_eq!(options.filter, InterpolationFilter::Bilinear);
        assert_eq!(options.fill, [0, 0, 0]);
    }

    #[test]
    fn test_transform_is_shareable() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CropTransform>();
        assert_send_sync::<CroppedImage>();
        assert_send_sync::<CropError>();
    }

    #[test]
    fn test_bounds_reexport() {
        assert_eq!(compute_rotated_bounds(300, 200, 90.0), (200, 300));
    }
}
