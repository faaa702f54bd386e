//! `data:` URL handling.
//!
//! The admin forms keep uploaded and cropped images as base64 `data:` URLs
//! in form state until the form is submitted, so both the input and the
//! output of a crop commonly travel in this shape.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::decode::DecodeError;

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type, e.g. `image/png`. Empty when the URL omitted it.
    pub mime: String,
    /// Decoded payload.
    pub data: Vec<u8>,
}

/// Parse a `data:<mime>[;params];base64,<payload>` URL.
///
/// Whitespace inside the payload is ignored. Only base64 payloads are
/// accepted since image bytes are never percent-encoded in practice.
pub fn parse_data_url(url: &str) -> Result<DataUrl, DecodeError> {
    let rest = strip_scheme(url)
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing `data:` prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing `,` separator".to_string()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(DecodeError::InvalidDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let data = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| DecodeError::InvalidDataUrl(e.to_string()))?;

    Ok(DataUrl { mime, data })
}

/// Build a base64 `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Convert an uploaded file's bytes into a `data:` URL, sniffing the image
/// MIME type from its magic bytes.
pub fn file_to_data_url(bytes: &[u8]) -> Result<String, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;
    Ok(to_data_url(format.to_mime_type(), bytes))
}

/// Whether `reference` looks like a `data:` URL.
pub fn is_data_url(reference: &str) -> bool {
    strip_scheme(reference).is_some()
}

fn strip_scheme(url: &str) -> Option<&str> {
    let url = url.trim_start();
    let prefix = url.get(..5)?;
    prefix.eq_ignore_ascii_case("data:").then(|| &url[5..])
}
