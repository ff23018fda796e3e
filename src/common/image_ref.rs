use image::ImageFormat;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Handle to a locally available image, supplied per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Path(PathBuf),
    Uri(String),
    Bytes(Arc<[u8]>),
}

impl ImageRef {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        ImageRef::Bytes(bytes.into())
    }
}

impl FromStr for ImageRef {
    type Err = Infallible;

    // http(s) URIs are fetched, file:// URIs and bare strings are read from disk
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(ImageRef::Uri(s.to_string()));
        }
        if let Some(path) = s.strip_prefix("file://") {
            return Ok(ImageRef::Path(PathBuf::from(path)));
        }
        Ok(ImageRef::Path(PathBuf::from(s)))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Path(path) => write!(f, "{}", path.display()),
            ImageRef::Uri(uri) => f.write_str(uri),
            ImageRef::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Base64 text of an image, ready to embed in a classification request.
/// Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    content: Arc<str>,
    format: Option<ImageFormat>,
}

impl EncodedImage {
    pub fn new(content: impl Into<Arc<str>>, format: Option<ImageFormat>) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Format sniffed from the raw bytes, if recognisable.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}
