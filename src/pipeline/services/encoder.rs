use crate::common::{EncodedImage, ImageRef};
use crate::error::EncodingError;
use base64::{Engine, engine::general_purpose};
use tracing::debug;

/// Reads an image once and base64-encodes it. Does not retry.
#[derive(Debug, Clone, Default)]
pub struct ImageEncoder {
    http: reqwest::Client,
}

impl ImageEncoder {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn encode(&self, image: &ImageRef) -> Result<EncodedImage, EncodingError> {
        let bytes = self.read(image).await?;
        if bytes.is_empty() {
            return Err(EncodingError::EmptyPayload);
        }

        let format = image::guess_format(&bytes).ok();
        let content = general_purpose::STANDARD.encode(&bytes);
        debug!(
            "Encoded {} ({} bytes, format {:?}) into {} base64 chars",
            image,
            bytes.len(),
            format,
            content.len()
        );

        Ok(EncodedImage::new(content, format))
    }

    async fn read(&self, image: &ImageRef) -> Result<Vec<u8>, EncodingError> {
        match image {
            ImageRef::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| EncodingError::Unreadable {
                        path: path.clone(),
                        source,
                    })
            }
            ImageRef::Uri(uri) => {
                let fetch_failed = |e: reqwest::Error| EncodingError::FetchFailed {
                    uri: uri.clone(),
                    reason: e.to_string(),
                };
                let response = self
                    .http
                    .get(uri.as_str())
                    .send()
                    .await
                    .and_then(|response| response.error_for_status())
                    .map_err(fetch_failed)?;
                let bytes = response.bytes().await.map_err(fetch_failed)?;
                Ok(bytes.to_vec())
            }
            ImageRef::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}
