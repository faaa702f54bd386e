//! WASM bindings for the crop transform.
//!
//! Errors reach JavaScript as `Error` objects whose `name` is the error kind
//! (`DecodeError`, `InvalidRegionError`, ...), so callers can branch on
//! `err.name` without parsing messages.

use crate::types::JsCroppedImage;
use cropkit_core::{
    compute_rotated_bounds, CropError, CropOptions, CropRegion, CropTransform, DecodeError,
    ImageSource,
};
use wasm_bindgen::prelude::*;

/// Crop an image with a rotation applied first.
///
/// # Arguments
///
/// * `source` - A `data:` URL string or a `Uint8Array` of encoded bytes
/// * `region` - `{ x, y, width, height }` in pixels of the rotated canvas
/// * `rotation` - Degrees, positive = clockwise
/// * `options` - Optional `{ format, filter, fill }`; omitted fields keep
///   their defaults (JPEG quality 92, bilinear, black fill)
///
/// # Errors
///
/// Rejects with an `Error` named `DecodeError` when the source cannot be
/// read, or `InvalidRegionError` when the region is empty or misses the
/// rotated canvas. Options that do not deserialize reject with a
/// `TypeError`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// try {
///   const cropped = await crop_image(dataUrl, pixelCrop, rotation);
///   setCover(cropped.data_url());
/// } catch (err) {
///   if (err.name === 'InvalidRegionError') showCropHint();
/// }
/// ```
#[wasm_bindgen]
pub async fn crop_image(
    source: JsValue,
    region: JsValue,
    rotation: f64,
    options: JsValue,
) -> Result<JsCroppedImage, JsValue> {
    let source = source_from_js(&source).map_err(|e| to_js_error(&e))?;
    let region: CropRegion = serde_wasm_bindgen::from_value(region)
        .map_err(|e| named_error("InvalidRegionError", &format!("Invalid crop region: {}", e)))?;
    let options = options_from_js(options)?;

    crop_source(&source, &region, rotation, options).map_err(|e| to_js_error(&e))
}

/// Size of the canvas a `width` x `height` image occupies once rotated.
///
/// Returns `[width, height]`. The crop widget uses this to lay out its
/// selection before calling [`crop_image`].
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, rotation: f64) -> Vec<u32> {
    let (w, h) = compute_rotated_bounds(width, height, rotation);
    vec![w, h]
}

/// Turn freshly selected file bytes into a `data:` URL.
///
/// The MIME type is sniffed from the bytes, so a mislabelled upload still
/// gets the right type.
#[wasm_bindgen]
pub fn file_to_data_url(bytes: &[u8]) -> Result<String, JsValue> {
    cropkit_core::file_to_data_url(bytes)
        .map_err(|e| to_js_error(&CropError::Decode(e)))
}

fn crop_source(
    source: &ImageSource,
    region: &CropRegion,
    rotation: f64,
    options: CropOptions,
) -> Result<JsCroppedImage, CropError> {
    tracing::debug!(?region, rotation, "crop_image");
    let cropped = CropTransform::new(options).crop_source(source, region, rotation)?;
    Ok(JsCroppedImage::from_cropped(cropped))
}

fn source_from_js(source: &JsValue) -> Result<ImageSource, CropError> {
    if let Some(reference) = source.as_string() {
        // Only data URLs make sense inside the browser sandbox
        return match ImageSource::parse(&reference)? {
            url @ ImageSource::DataUrl(_) => Ok(url),
            _ => Err(DecodeError::UnsupportedSource(reference).into()),
        };
    }

    if let Some(array) = source.dyn_ref::<js_sys::Uint8Array>() {
        return Ok(ImageSource::Bytes(array.to_vec()));
    }

    Err(DecodeError::UnsupportedSource(
        "expected a data URL string or a Uint8Array".to_string(),
    )
    .into())
}

fn options_from_js(options: JsValue) -> Result<CropOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CropOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| named_error("TypeError", &format!("Invalid crop options: {}", e)))
}

fn to_js_error(err: &CropError) -> JsValue {
    named_error(err.kind(), &err.to_string())
}

fn named_error(name: &str, message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    error.set_name(name);
    error.into()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cropkit_core::encode::encode_png;
    use cropkit_core::DecodedImage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn region(x: f64, y: f64, width: f64, height: f64) -> JsValue {
        serde_wasm_bindgen::to_value(&CropRegion::new(x, y, width, height)).unwrap()
    }

    fn red_png_array(size: u32) -> JsValue {
        let png = encode_png(&DecodedImage::filled(size, size, [255, 0, 0])).unwrap();
        js_sys::Uint8Array::from(png.as_slice()).into()
    }

    fn error_name(value: JsValue) -> String {
        value.dyn_into::<js_sys::Error>().unwrap().name().into()
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_from_uint8array() {
        let cropped = crop_image(
            red_png_array(100),
            region(0.0, 0.0, 50.0, 50.0),
            0.0,
            JsValue::UNDEFINED,
        )
        .await
        .unwrap();
        assert_eq!((cropped.width(), cropped.height()), (50, 50));
        assert_eq!(cropped.mime(), "image/jpeg");
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_from_data_url() {
        let png = encode_png(&DecodedImage::filled(8, 8, [0, 0, 255])).unwrap();
        let url = file_to_data_url(&png).unwrap();

        let cropped = crop_image(
            JsValue::from_str(&url),
            region(0.0, 0.0, 8.0, 8.0),
            90.0,
            JsValue::NULL,
        )
        .await
        .unwrap();
        assert_eq!((cropped.width(), cropped.height()), (8, 8));
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_rejects_empty_region() {
        let err = crop_image(
            red_png_array(10),
            region(0.0, 0.0, 0.0, 5.0),
            0.0,
            JsValue::UNDEFINED,
        )
        .await
        .err()
        .unwrap();
        assert_eq!(error_name(err), "InvalidRegionError");
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_rejects_bad_options_with_named_error() {
        let options = js_sys::JSON::parse(r#"{"filter":"sharpest"}"#).unwrap();
        let err = crop_image(red_png_array(10), region(0.0, 0.0, 5.0, 5.0), 0.0, options)
            .await
            .err()
            .unwrap();
        assert_eq!(error_name(err), "TypeError");
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_rejects_corrupt_source() {
        let bytes: JsValue = js_sys::Uint8Array::from(&[1u8, 2, 3][..]).into();
        let err = crop_image(bytes, region(0.0, 0.0, 5.0, 5.0), 0.0, JsValue::UNDEFINED)
            .await
            .err()
            .unwrap();
        assert_eq!(error_name(err), "DecodeError");
    }

    #[wasm_bindgen_test]
    async fn test_crop_image_rejects_remote_url() {
        let err = crop_image(
            JsValue::from_str("https://example.com/cover.jpg"),
            region(0.0, 0.0, 5.0, 5.0),
            0.0,
            JsValue::UNDEFINED,
        )
        .await
        .err()
        .unwrap();
        assert_eq!(error_name(err), "DecodeError");
    }

    #[wasm_bindgen_test]
    fn test_file_to_data_url_rejects_unknown_bytes() {
        let err = file_to_data_url(b"plain text").unwrap_err();
        assert_eq!(error_name(err), "DecodeError");
    }
}
