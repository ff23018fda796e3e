use super::types::{ClassificationRequest, Feature, FeatureKind, RawDetectionResult};
use crate::common::EncodedImage;
use crate::config::VisionSettings;
use crate::error::ClassificationError;
use crate::network::transport::VisionTransport;
use image::ImageFormat;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, warn};

// Formats the annotate endpoint accepts; unrecognised payloads are still sent.
const SUPPORTED_FORMATS: [ImageFormat; 7] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
    ImageFormat::Ico,
    ImageFormat::Tiff,
];

/// Client for the remote `images:annotate` endpoint. Sends exactly one request
/// per call; retrying is left to the caller.
pub struct VisionClient {
    settings: VisionSettings,
    transport: Arc<dyn VisionTransport>,
}

impl VisionClient {
    pub fn new(settings: VisionSettings, transport: Arc<dyn VisionTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &VisionSettings {
        &self.settings
    }

    /// Checks the credential and the image before anything touches the network.
    pub fn preflight(&self, image: &EncodedImage) -> Result<(), ClassificationError> {
        if !self.settings.has_credential() {
            return Err(ClassificationError::Config(
                "API key is missing or still the placeholder".to_string(),
            ));
        }

        if image.len() < self.settings.min_image_length {
            return Err(ClassificationError::InvalidImage {
                length: image.len(),
                minimum: self.settings.min_image_length,
            });
        }

        if let Some(format) = image.format() {
            if !SUPPORTED_FORMATS.contains(&format) {
                return Err(ClassificationError::UnsupportedFormat(format!("{:?}", format)));
            }
        }

        Ok(())
    }

    pub fn build_request(&self, image: &EncodedImage) -> ClassificationRequest {
        ClassificationRequest::new(
            image.clone(),
            vec![
                Feature::new(FeatureKind::LabelDetection, self.settings.label_max_results),
                Feature::new(FeatureKind::FaceDetection, self.settings.face_max_results),
                Feature::new(
                    FeatureKind::ObjectLocalization,
                    self.settings.object_max_results,
                ),
            ],
        )
    }

    fn request_url(&self) -> Result<Url, ClassificationError> {
        Url::parse_with_params(&self.settings.endpoint, &[("key", self.settings.api_key.trim())])
            .map_err(|e| {
                ClassificationError::Config(format!(
                    "invalid endpoint {}: {}",
                    self.settings.endpoint, e
                ))
            })
    }

    pub async fn annotate(
        &self,
        image: &EncodedImage,
    ) -> Result<RawDetectionResult, ClassificationError> {
        self.preflight(image)?;

        let request = self.build_request(image);
        let url = self.request_url()?;
        let body = request.to_json().map_err(|e| {
            ClassificationError::Network(format!("failed to serialize request: {}", e))
        })?;

        debug!(
            "Requesting {} features from {}",
            request.features().len(),
            self.settings.endpoint
        );
        let response = self.transport.post_json(url, body).await?;

        if !response.is_success() {
            warn!("Vision API responded with status {}", response.status);
            return Err(ClassificationError::Remote {
                status: response.status,
                body: response.body,
            });
        }

        let raw = RawDetectionResult::from_response_body(&response.body)?;
        debug!(
            "Received {} labels, {} faces, {} objects",
            raw.labels.len(),
            raw.faces.len(),
            raw.objects.len()
        );
        Ok(raw)
    }
}
