use super::client::VisionClient;
use super::types::RawDetectionResult;
use crate::common::EncodedImage;
use futures::Future;
use futures::task::{Context, Poll};
use std::pin::Pin;
use std::sync::Arc;
use tower::{BoxError, Service};

/// Exposes [`VisionClient::annotate`] as a tower service so it can be layered
/// with retry and timeout middleware.
#[derive(Clone)]
pub struct VisionService {
    client: Arc<VisionClient>,
}

impl VisionService {
    pub fn new(client: Arc<VisionClient>) -> Self {
        Self { client }
    }
}

impl Service<EncodedImage> for VisionService {
    type Response = RawDetectionResult;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: EncodedImage) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            client
                .annotate(&image)
                .await
                .map_err(|e| Box::new(e) as BoxError)
        })
    }
}
