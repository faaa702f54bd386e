//! Output encoding.
//!
//! This module provides:
//! - JPEG encoding with a configurable quality (the default output)
//! - PNG encoding for lossless output
//! - [`OutputFormat`], the encoder selection carried in crop options
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::DecodedImage;
//! use cropkit_core::encode::{encode, OutputFormat};
//!
//! let image = DecodedImage::filled(100, 100, [128, 128, 128]);
//! let bytes = encode(&image, OutputFormat::default()).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod format;
mod jpeg;
mod png;

pub use format::{encode, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
