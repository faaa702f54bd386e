//! Pixel-block extraction from the rotated canvas.
//!
//! The output always has exactly the size of the requested rectangle. The
//! part of the rectangle that overlaps the canvas is copied row by row; the
//! rest keeps the fill colour, which is what a canvas `drawImage` of an
//! out-of-range source rectangle leaves behind once flattened to RGB.

use super::region::PixelRect;
use crate::decode::DecodedImage;

/// Copy the `rect` block of `canvas` into a new image of `rect`'s size.
///
/// Pixels of `rect` that fall outside the canvas are set to `fill`.
pub fn extract_region(canvas: &DecodedImage, rect: PixelRect, fill: [u8; 3]) -> DecodedImage {
    // Fast path: the block is the whole canvas
    if rect.covers_exactly(canvas.width, canvas.height) {
        return canvas.clone();
    }

    let mut output = DecodedImage::filled(rect.width, rect.height, fill);

    let Some(visible) = rect.intersect(canvas.width, canvas.height) else {
        return output;
    };

    let row_bytes = visible.width as usize * 3;
    let dst_x = (visible.x - rect.x) as usize;
    let dst_y = (visible.y - rect.y) as usize;

    for row in 0..visible.height as usize {
        let src_start =
            ((visible.y as usize + row) * canvas.width as usize + visible.x as usize) * 3;
        let dst_start = ((dst_y + row) * rect.width as usize + dst_x) * 3;

        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&canvas.pixels[src_start..src_start + row_bytes]);
    }

    output
}
