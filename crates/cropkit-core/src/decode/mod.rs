//! Source image decoding.
//!
//! This module provides functionality for:
//! - Decoding any raster format the `image` crate is built with (JPEG, PNG,
//!   GIF, WebP)
//! - Applying EXIF orientation so the raster matches what the browser showed
//!
//! All decoding produces an RGB8 [`DecodedImage`], which is also the pixel
//! format of the rotated canvas and of the cropped output.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("cover.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
