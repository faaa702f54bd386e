//! The crop transform: decode, rotate, cut, encode.
//!
//! ```text
//! source ref ──decode──▶ SourceImage ──rotate──▶ canvas (rotated bounds)
//!                                                  │
//!                            OutputImage ◀─encode─ cut crop rect
//! ```
//!
//! Each call owns its rasters from start to finish, so a single
//! [`CropTransform`] can serve any number of concurrent calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_url::to_data_url;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode, EncodeError, OutputFormat};
use crate::source::ImageSource;
use crate::transform::{
    apply_rotation, compute_rotated_bounds, extract_region, normalize_degrees, CropRegion,
    InterpolationFilter, RegionError,
};

/// Errors a crop can fail with.
#[derive(Debug, Error)]
pub enum CropError {
    /// The source could not be loaded or decoded.
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    /// The crop region is unusable for this image.
    #[error("Invalid crop region: {0}")]
    InvalidRegion(#[from] RegionError),

    /// The encoder rejected a raster we built. Indicates a bug, not bad input.
    #[error("Failed to encode cropped image: {0}")]
    Encode(#[from] EncodeError),

    /// The blocking task was torn down before it produced a result.
    #[error("Crop was cancelled before it finished")]
    Cancelled,
}

impl CropError {
    /// Stable name for the error kind, used as the JS `Error.name`.
    pub fn kind(&self) -> &'static str {
        match self {
            CropError::Decode(_) => "DecodeError",
            CropError::InvalidRegion(_) => "InvalidRegionError",
            CropError::Encode(_) => "EncodeError",
            CropError::Cancelled => "Cancelled",
        }
    }
}

/// Crop settings.
///
/// Deserializes from a partial camelCase object, so the front end only has
/// to send the fields it wants to change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Encoding of the result. JPEG at quality 92 unless set.
    pub format: OutputFormat,
    /// Filter used when drawing the rotated source.
    pub filter: InterpolationFilter,
    /// Colour for output pixels not covered by the rotated source.
    pub fill: [u8; 3],
}

/// An encoded crop result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    /// Width in pixels, equal to the crop region width.
    pub width: u32,
    /// Height in pixels, equal to the crop region height.
    pub height: u32,
    /// Format `bytes` are encoded in.
    pub format: OutputFormat,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

impl CroppedImage {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// The result as a base64 `data:` URL, ready to drop into form state.
    pub fn to_data_url(&self) -> String {
        to_data_url(self.mime(), &self.bytes)
    }
}

/// Rotate-and-crop transform with fixed options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropTransform {
    options: CropOptions,
}

impl CropTransform {
    pub fn new(options: CropOptions) -> Self {
        Self { options }
    }

    /// Crop an already decoded image.
    ///
    /// The image is rotated clockwise by `rotation_degrees` onto a canvas the
    /// size of its rotated bounding box, and `region` is cut out of that
    /// canvas. The result always has the region's size.
    pub fn apply(
        &self,
        image: &DecodedImage,
        region: &CropRegion,
        rotation_degrees: f64,
    ) -> Result<DecodedImage, CropError> {
        let rect = region.to_pixel_rect()?;
        let degrees = normalize_degrees(rotation_degrees);

        let (canvas_w, canvas_h) = compute_rotated_bounds(image.width, image.height, degrees);
        rect.require_overlap(canvas_w, canvas_h)?;

        tracing::debug!(
            source_width = image.width,
            source_height = image.height,
            degrees,
            canvas_width = canvas_w,
            canvas_height = canvas_h,
            crop_x = rect.x,
            crop_y = rect.y,
            crop_width = rect.width,
            crop_height = rect.height,
            "cropping rotated canvas"
        );

        let canvas = apply_rotation(image, degrees, self.options.filter, self.options.fill);
        Ok(extract_region(&canvas, rect, self.options.fill))
    }

    /// Decode, crop and encode in one synchronous call.
    pub fn crop_bytes(
        &self,
        bytes: &[u8],
        region: &CropRegion,
        rotation_degrees: f64,
    ) -> Result<CroppedImage, CropError> {
        // Reject malformed regions before paying for a decode
        region.to_pixel_rect()?;

        let image = decode_image(bytes)?;
        tracing::debug!(
            encoded_len = bytes.len(),
            width = image.width,
            height = image.height,
            "decoded source"
        );

        let cropped = self.apply(&image, region, rotation_degrees)?;
        self.encode(&cropped)
    }

    /// Load a source synchronously and crop it.
    pub fn crop_source(
        &self,
        source: &ImageSource,
        region: &CropRegion,
        rotation_degrees: f64,
    ) -> Result<CroppedImage, CropError> {
        let bytes = source.load_bytes()?;
        self.crop_bytes(&bytes, region, rotation_degrees)
    }

    /// Load a source and crop it without blocking the async runtime.
    ///
    /// File reads go through `tokio::fs`; decoding, rendering and encoding
    /// run on the blocking pool. A panic there is re-raised in the caller.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn crop(
        &self,
        source: ImageSource,
        region: CropRegion,
        rotation_degrees: f64,
    ) -> Result<CroppedImage, CropError> {
        let bytes = source.load_bytes_async().await?;
        let transform = *self;

        let task = tokio::task::spawn_blocking(move || {
            transform.crop_bytes(&bytes, &region, rotation_degrees)
        });

        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(CropError::Cancelled),
        }
    }

    fn encode(&self, image: &DecodedImage) -> Result<CroppedImage, CropError> {
        let bytes = encode(image, self.options.format)?;
        tracing::debug!(
            width = image.width,
            height = image.height,
            mime = self.options.format.mime(),
            encoded_len = bytes.len(),
            "encoded crop"
        );

        Ok(CroppedImage {
            width: image.width,
            height: image.height,
            format: self.options.format,
            bytes,
        })
    }
}

/// Crop `source` with default options (JPEG q92, bilinear, black fill).
#[cfg(not(target_arch = "wasm32"))]
pub async fn crop(
    source: impl Into<ImageSource>,
    region: CropRegion,
    rotation_degrees: f64,
) -> Result<CroppedImage, CropError> {
    CropTransform::default()
        .crop(source.into(), region, rotation_degrees)
        .await
}
