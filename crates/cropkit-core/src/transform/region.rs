//! Crop regions on the rotated canvas.
//!
//! A [`CropRegion`] is what the cropping widget reports: a pixel rectangle
//! over the *rotated and re-framed* image, possibly with fractional values.
//! It is snapped to a [`PixelRect`] before any pixels are touched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest crop side we accept, matching the canvas size limit browsers
/// enforce on the front end.
pub const MAX_REGION_SIDE: u32 = 32_767;

/// Largest crop area we accept, in pixels (16384 x 16384, the browser
/// canvas area limit).
pub const MAX_REGION_AREA: u64 = 268_435_456;

/// Why a crop region cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// One of the coordinates is NaN or infinite.
    #[error("Crop region has a non-finite coordinate")]
    NonFinite,

    /// Width or height is zero or negative after snapping to whole pixels.
    #[error("Crop region is empty ({width}x{height})")]
    Empty { width: f64, height: f64 },

    /// The region is larger than any canvas we can allocate.
    #[error("Crop region {width}x{height} exceeds the {max}px side limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// The region's pixel count is larger than any canvas we can allocate.
    #[error("Crop region {width}x{height} exceeds the {max_area} pixel area limit")]
    AreaTooLarge { width: u32, height: u32, max_area: u64 },

    /// The region does not overlap the rotated image at all.
    #[error(
        "Crop region at ({x}, {y}) size {width}x{height} lies outside the {canvas_width}x{canvas_height} canvas"
    )]
    OutsideCanvas {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },
}

/// A crop rectangle in rotated-canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering a whole canvas of the given size.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Build a region from fractions (0.0 to 1.0) of the canvas size.
    ///
    /// The cropping widget can also report its selection as percentages of
    /// the rotated bounding box; this converts that form to pixels.
    pub fn from_normalized(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let (cw, ch) = (canvas_width as f64, canvas_height as f64);
        Self::new(left * cw, top * ch, width * cw, height * ch)
    }

    /// Snap the region to whole pixels.
    ///
    /// Every coordinate is rounded to the nearest pixel. The origin may be
    /// negative; that part of the output is filled rather than clamped away.
    pub fn to_pixel_rect(&self) -> Result<PixelRect, RegionError> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RegionError::NonFinite);
        }

        let width = self.width.round();
        let height = self.height.round();
        if width < 1.0 || height < 1.0 {
            return Err(RegionError::Empty {
                width: self.width,
                height: self.height,
            });
        }

        let max = MAX_REGION_SIDE as f64;
        if width > max || height > max {
            return Err(RegionError::TooLarge {
                width: width.min(u32::MAX as f64) as u32,
                height: height.min(u32::MAX as f64) as u32,
                max: MAX_REGION_SIDE,
            });
        }

        let (width, height) = (width as u32, height as u32);
        if width as u64 * height as u64 > MAX_REGION_AREA {
            return Err(RegionError::AreaTooLarge {
                width,
                height,
                max_area: MAX_REGION_AREA,
            });
        }

        Ok(PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width,
            height,
        })
    }
}

/// A crop rectangle snapped to the pixel grid. Width and height are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// The part of this rectangle that lies on a `canvas_width` x
    /// `canvas_height` canvas, or `None` if they do not overlap.
    pub fn intersect(&self, canvas_width: u32, canvas_height: u32) -> Option<PixelRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = self.x.saturating_add(self.width as i64).min(canvas_width as i64);
        let bottom = self.y.saturating_add(self.height as i64).min(canvas_height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left,
            y: top,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    /// Whether this rectangle covers exactly the given canvas.
    pub fn covers_exactly(&self, canvas_width: u32, canvas_height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == canvas_width && self.height == canvas_height
    }

    /// Fail with [`RegionError::OutsideCanvas`] when there is no overlap.
    pub fn require_overlap(
        &self,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<PixelRect, RegionError> {
        self.intersect(canvas_width, canvas_height)
            .ok_or(RegionError::OutsideCanvas {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                canvas_width,
                canvas_height,
            })
    }
}
