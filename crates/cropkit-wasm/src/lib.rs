//! Cropkit WASM - WebAssembly bindings for the crop transform
//!
//! This crate exposes cropkit-core to the upload form running in the
//! browser, replacing the canvas round trip the cropping widget would
//! otherwise need.
//!
//! # Module Structure
//!
//! - `crop` - The crop entry point plus helpers for the crop widget
//! - `types` - WASM-compatible wrapper for the crop result
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop_image } from '@cropkit/wasm';
//!
//! await init();
//!
//! const cropped = await crop_image(form.cover, { x: 0, y: 0, width: 512, height: 512 }, 90);
//! form.cover = cropped.data_url();
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

mod crop;
mod types;

pub use crop::{crop_image, file_to_data_url, rotated_bounds};
pub use types::JsCroppedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let filter = EnvFilter::new("info,cropkit_core=debug,cropkit_wasm=debug");

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    // A second init (e.g. a hot reload) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
