//! Loadable image references.
//!
//! A crop starts from whatever the caller has at hand: raw upload bytes, the
//! `data:` URL already sitting in form state, or a file on disk when running
//! natively.

use std::borrow::Cow;
use std::path::PathBuf;
use std::str::FromStr;

use crate::data_url::{is_data_url, parse_data_url};
use crate::decode::DecodeError;

/// Where the encoded source image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// A base64 `data:` URL.
    DataUrl(String),
    /// A file on the local filesystem.
    Path(PathBuf),
}

impl ImageSource {
    /// Parse a string image reference.
    ///
    /// `data:` URLs and `file://` URLs are recognised; anything without a
    /// scheme is taken as a filesystem path. Remote URLs are rejected since
    /// fetching them is the caller's job.
    pub fn parse(reference: &str) -> Result<Self, DecodeError> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(DecodeError::UnsupportedSource("empty image reference".to_string()));
        }

        if is_data_url(trimmed) {
            return Ok(ImageSource::DataUrl(trimmed.to_string()));
        }

        if let Some(path) = trimmed.strip_prefix("file://") {
            return Ok(ImageSource::Path(PathBuf::from(path)));
        }

        if has_url_scheme(trimmed) {
            return Err(DecodeError::UnsupportedSource(trimmed.to_string()));
        }

        Ok(ImageSource::Path(PathBuf::from(trimmed)))
    }

    /// Load the encoded bytes, blocking on file I/O if needed.
    pub fn load_bytes(&self) -> Result<Cow<'_, [u8]>, DecodeError> {
        match self {
            ImageSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            ImageSource::DataUrl(url) => Ok(Cow::Owned(parse_data_url(url)?.data)),
            ImageSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
        }
    }

    /// Load the encoded bytes without blocking the async runtime.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn load_bytes_async(self) -> Result<Vec<u8>, DecodeError> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::DataUrl(url) => Ok(parse_data_url(&url)?.data),
            ImageSource::Path(path) => Ok(tokio::fs::read(&path).await?),
        }
    }
}

impl FromStr for ImageSource {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSource::parse(s)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// RFC 3986 scheme followed by `:`, excluding single letters so Windows
/// drive paths like `C:\art\cover.png` still parse as paths.
fn has_url_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
