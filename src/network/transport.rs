use crate::error::ClassificationError;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to the remote classifier. Transport failures surface as
/// `ClassificationError::Network`; any HTTP status is a successful exchange.
#[async_trait]
pub trait VisionTransport: Send + Sync {
    async fn post_json(
        &self,
        url: Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, ClassificationError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionTransport for HttpTransport {
    async fn post_json(
        &self,
        url: Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, ClassificationError> {
        debug!("POST {}{} ({} bytes)", url.origin().ascii_serialization(), url.path(), body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ClassificationError::Network(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClassificationError::Network(e.without_url().to_string()))?;

        Ok(TransportResponse { status, body })
    }
}
