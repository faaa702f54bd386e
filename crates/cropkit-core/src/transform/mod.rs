//! Rotation and crop geometry.
//!
//! # Transform Order
//!
//! 1. Rotate the source about its center onto a canvas sized to the rotated
//!    bounding box
//! 2. Cut the crop rectangle out of that canvas
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are pixels on the rotated canvas
//! - Origin is the top-left corner, y grows downward

mod crop;
mod region;
mod rotation;

pub use crop::extract_region;
pub use region::{CropRegion, PixelRect, RegionError, MAX_REGION_AREA, MAX_REGION_SIDE};
pub use rotation::{apply_rotation, compute_rotated_bounds, normalize_degrees, InterpolationFilter};
