use super::lockout::LockoutState;
use crate::common::ImageRef;
use crate::config::Configuration;
use crate::error::{AppError, ClassificationError, ConfigurationError};
use crate::network::retry::{Retry, RetryLayer, RetryPolicy};
use crate::network::transport::{HttpTransport, VisionTransport};
use crate::network::vision::{VisionClient, VisionService};
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::domain::AnalysisResult;
use crate::pipeline::services::classifier::LabelClassifier;
use crate::pipeline::services::encoder::ImageEncoder;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tower::timeout::{Timeout, TimeoutLayer};
use tower::util::Either;
use tower::{ServiceBuilder, ServiceExt};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

// retry outermost, timeout per attempt
type DetectionService = Retry<Either<Timeout<VisionService>, VisionService>>;

/// Single entry point for the UI: encode, request with retries, classify.
/// Holds no per-call state; concurrent calls run independent pipelines.
pub struct BodyAnalyzer {
    encoder: ImageEncoder,
    client: Arc<VisionClient>,
    detection: DetectionService,
    classifier: LabelClassifier,
    lockout: Mutex<LockoutState>,
    lockout_duration: Option<Duration>,
}

impl BodyAnalyzer {
    pub fn builder(configuration: Configuration) -> BodyAnalyzerBuilder {
        BodyAnalyzerBuilder::new(configuration)
    }

    pub async fn analyze(&self, image: &ImageRef) -> Result<AnalysisResult, AppError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("analyze", %run_id);

        async move {
            let result = self.run(run_id, image).await;
            if let Err(e) = &result {
                error!("Analysis of {} failed: {}", image, e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, run_id: Uuid, image: &ImageRef) -> Result<AnalysisResult, AppError> {
        self.check_lockout().await?;

        let context = AnalysisContext::new(run_id);
        debug!("Encoding {}", image);
        let encoded = self.encoder.encode(image).await?;
        let context = context.into_encoded(encoded);

        // credential and size problems are not worth retrying
        self.client.preflight(context.image())?;

        debug!("Requesting detections");
        let detections = self
            .detection
            .clone()
            .oneshot(context.image().clone())
            .await
            .map_err(ClassificationError::from_service_error);

        let detections = match detections {
            Ok(detections) => detections,
            Err(e) => {
                if e.is_rate_limited() {
                    self.engage_lockout().await;
                }
                return Err(e.into());
            }
        };
        let context = context.into_detected(detections);

        debug!("Classifying detections");
        let result = self.classifier.classify(context.detections());
        let context = context.into_classified(result);

        let metrics = context.metrics();
        info!(
            "Classified as {} ({}) with confidence {} in {:?} (encode {:?}, request {:?}, classify {:?})",
            context.result().category(),
            context.result().category().label(),
            context.result().confidence(),
            metrics.total(),
            metrics.encode_duration().unwrap_or_default(),
            metrics.request_duration().unwrap_or_default(),
            metrics.classify_duration().unwrap_or_default(),
        );

        Ok(context.into_result())
    }

    async fn check_lockout(&self) -> Result<(), AppError> {
        let lockout = self.lockout.lock().await;
        match lockout.remaining(Instant::now()) {
            Some(remaining) => {
                warn!("Rate-limit lockout active for another {:?}", remaining);
                Err(AppError::LockedOut(remaining))
            }
            None => Ok(()),
        }
    }

    async fn engage_lockout(&self) {
        if let Some(duration) = self.lockout_duration {
            warn!("Rate limited by vision API, locking out for {:?}", duration);
            self.lockout.lock().await.engage(Instant::now(), duration);
        }
    }

    /// Remaining lockout, if a rate-limit response engaged one.
    pub async fn lockout_remaining(&self) -> Option<Duration> {
        self.lockout.lock().await.remaining(Instant::now())
    }

    pub async fn clear_lockout(&self) {
        self.lockout.lock().await.clear();
    }
}

pub struct BodyAnalyzerBuilder {
    configuration: Configuration,
    transport: Option<Arc<dyn VisionTransport>>,
    http: Option<reqwest::Client>,
}

impl BodyAnalyzerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            transport: None,
            http: None,
        }
    }

    // Replaces the HTTP transport used for classification requests.
    pub fn transport(mut self, transport: Arc<dyn VisionTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    // Shares one HTTP client between image fetches and the default transport.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.configuration.retry.max_attempts = policy.max_attempts();
        self.configuration.retry.base_delay_ms = policy.base_delay().as_millis() as u64;
        self
    }

    pub fn build(self) -> Result<BodyAnalyzer, AppError> {
        self.configuration
            .validate()
            .map_err(ConfigurationError::Invalid)?;

        let http = self.http.unwrap_or_default();
        let transport = self.transport.unwrap_or_else(|| {
            Arc::new(HttpTransport::with_client(http.clone())) as Arc<dyn VisionTransport>
        });

        let client = Arc::new(VisionClient::new(
            self.configuration.vision.clone(),
            transport,
        ));

        let detection = ServiceBuilder::new()
            .layer(RetryLayer::new(self.configuration.retry.policy()))
            .option_layer(self.configuration.vision.request_timeout().map(TimeoutLayer::new))
            .service(VisionService::new(client.clone()));

        Ok(BodyAnalyzer {
            encoder: ImageEncoder::new(http),
            client,
            detection,
            classifier: LabelClassifier::new(&self.configuration.analysis),
            lockout: Mutex::new(LockoutState::new()),
            lockout_duration: self.configuration.analysis.rate_limit_lockout(),
        })
    }
}
