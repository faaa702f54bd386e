//! Rotated canvas rendering.
//!
//! The crop region is expressed against the source image after it has been
//! rotated about its center and re-framed into its axis-aligned bounding
//! box. This module renders that intermediate canvas.
//!
//! # Algorithm
//!
//! Positive angles rotate clockwise on screen (the y axis points down, as
//! on a 2D canvas). The canvas is rendered by inverse mapping: for each
//! destination pixel center we find the source point that lands there and
//! sample it with the configured filter.
//!
//! For a clockwise rotation by θ the inverse transform is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the destination pixel center relative to the canvas
//! center. Quarter turns skip interpolation and remap pixels exactly.

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Tolerance, in degrees, for snapping an angle to a quarter turn.
const QUARTER_TURN_EPSILON: f64 = 0.001;

/// Interpolation filter for drawing the source onto the rotated canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbour. Hard pixel edges, fastest.
    Nearest,
    /// Bilinear interpolation, what a canvas does with smoothing enabled.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation. Sharper, noticeably slower.
    Lanczos3,
}

/// Normalize an angle in degrees to `[0, 360)`.
///
/// Non-finite angles have no meaningful rotation and are treated as 0.
pub fn normalize_degrees(angle_degrees: f64) -> f64 {
    if !angle_degrees.is_finite() {
        tracing::warn!(angle_degrees, "non-finite rotation angle, treating as 0");
        return 0.0;
    }

    let normalized = angle_degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Number of clockwise quarter turns if the angle is (nearly) a multiple of 90.
fn quarter_turns(normalized_degrees: f64) -> Option<u32> {
    let turns = (normalized_degrees / 90.0).round();
    if (normalized_degrees - turns * 90.0).abs() < QUARTER_TURN_EPSILON {
        Some(turns as u32 % 4)
    } else {
        None
    }
}

/// Compute the dimensions of the bounding box of a rotated image.
///
/// ```text
/// new_w = |w * cos θ| + |h * sin θ|
/// new_h = |w * sin θ| + |h * cos θ|
/// ```
///
/// Results are rounded to whole pixels and never zero. Quarter turns are
/// exact: 90 and 270 swap the dimensions, 0 and 180 keep them.
///
/// # Example
///
/// ```
/// use cropkit_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
/// assert_eq!(compute_rotated_bounds(100, 50, 360.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let degrees = normalize_degrees(angle_degrees);

    if let Some(turns) = quarter_turns(degrees) {
        return if turns % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let angle_rad = degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Draw an image onto a canvas sized to its rotated bounding box.
///
/// The image is rotated clockwise by `angle_degrees` around its center and
/// the canvas is expanded so nothing is clipped. Canvas pixels the rotated
/// image does not cover are set to `fill`.
pub fn apply_rotation(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
    fill: [u8; 3],
) -> DecodedImage {
    let degrees = normalize_degrees(angle_degrees);

    if let Some(turns) = quarter_turns(degrees) {
        return rotate_quarter_turns(image, turns);
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, degrees);

    let angle_rad = degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Pixel centers sit at +0.5; source sample coordinates are in index space.
    let src_cx = image.width as f64 / 2.0 - 0.5;
    let src_cy = image.height as f64 / 2.0 - 0.5;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);

    for dst_y in 0..dst_h {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y, fill),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y, fill),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y, fill),
            };
            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

/// Exact clockwise rotation by `turns` quarter turns.
fn rotate_quarter_turns(image: &DecodedImage, turns: u32) -> DecodedImage {
    if turns == 0 {
        return image.clone();
    }

    let buffer = image.to_rgb_image();
    let rotated = match turns {
        1 => imageops::rotate90(&buffer),
        2 => imageops::rotate180(&buffer),
        _ => imageops::rotate270(&buffer),
    };
    DecodedImage::from_rgb_image(rotated)
}

/// Whether a sample point falls inside the source's pixel footprint.
#[inline]
fn covers(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < image.width as f64 - 0.5 && y < image.height as f64 - 0.5
}

#[inline]
fn get_pixel_f64(image: &DecodedImage, px: u32, py: u32) -> [f64; 3] {
    let [r, g, b] = image.pixel(px, py);
    [r as f64, g as f64, b as f64]
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    if !covers(image, x, y) {
        return fill;
    }
    let px = ((x + 0.5).floor() as i64).clamp(0, image.width as i64 - 1) as u32;
    let py = ((y + 0.5).floor() as i64).clamp(0, image.height as i64 - 1) as u32;
    image.pixel(px, py)
}

/// Bilinear sampling over the 4 nearest pixels; neighbours past the edge
/// are clamped so border pixels keep their full colour.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    if !covers(image, x, y) {
        return fill;
    }

    let max_x = image.width as i64 - 1;
    let max_y = image.height as i64 - 1;

    let x_floor = x.floor();
    let y_floor = y.floor();
    let fx = x - x_floor;
    let fy = y - y_floor;

    let x0 = (x_floor as i64).clamp(0, max_x) as u32;
    let x1 = (x_floor as i64 + 1).clamp(0, max_x) as u32;
    let y0 = (y_floor as i64).clamp(0, max_y) as u32;
    let y1 = (y_floor as i64 + 1).clamp(0, max_y) as u32;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 sampling over a 6x6 neighbourhood, falling back to bilinear
/// where the kernel would reach past the image edge.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y, fill);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px as u32, py as u32);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the rendered canvas has exactly the computed bounds.
        #[test]
        fn prop_canvas_matches_bounds(
            width in 1u32..=40,
            height in 1u32..=40,
            angle in -720.0f64..720.0,
        ) {
            let img = DecodedImage::filled(width, height, [9, 9, 9]);
            let canvas = apply_rotation(&img, angle, InterpolationFilter::Bilinear, [0, 0, 0]);

            prop_assert_eq!(
                (canvas.width, canvas.height),
                compute_rotated_bounds(width, height, angle)
            );
            prop_assert_eq!(canvas.pixels.len(), canvas.pixel_count() * 3);
        }

        /// Property: bounds depend only on the angle modulo 360.
        #[test]
        fn prop_bounds_periodic(
            width in 1u32..=500,
            height in 1u32..=500,
            angle in 0.0f64..360.0,
            turns in -3i32..=3,
        ) {
            let shifted = angle + 360.0 * turns as f64;
            let a = compute_rotated_bounds(width, height, angle);
            let b = compute_rotated_bounds(width, height, shifted);
            prop_assert!((a.0 as i64 - b.0 as i64).abs() <= 1);
            prop_assert!((a.1 as i64 - b.1 as i64).abs() <= 1);
        }

        /// Property: the bounding box is never smaller than the shorter side
        /// and never larger than the diagonal.
        #[test]
        fn prop_bounds_within_diagonal(
            width in 1u32..=500,
            height in 1u32..=500,
            angle in 0.0f64..360.0,
        ) {
            let (w, h) = compute_rotated_bounds(width, height, angle);
            let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt().ceil() as u32;
            let shorter = width.min(height);
            prop_assert!(w >= shorter && h >= shorter);
            prop_assert!(w <= diagonal + 1 && h <= diagonal + 1);
        }
    }
}
