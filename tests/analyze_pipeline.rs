//! End-to-end runs of `BodyAnalyzer::analyze` against a scripted transport.

use async_trait::async_trait;
use bodyfit_rust::config::Configuration;
use bodyfit_rust::error::{AppError, ClassificationError, EncodingError};
use bodyfit_rust::network::{TransportResponse, VisionTransport};
use bodyfit_rust::pipeline::{BodyAnalyzer, BodyTypeCategory, SizeClass};
use bodyfit_rust::ImageRef;
use reqwest::Url;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

type Scripted = Result<TransportResponse, ClassificationError>;

struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(script: Vec<Scripted>, fallback: Scripted) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn always(response: Scripted) -> Arc<Self> {
        Self::new(Vec::new(), response)
    }

    fn slow(delay: Duration, response: Scripted) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: response,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionTransport for ScriptedTransport {
    async fn post_json(&self, _url: Url, _body: Vec<u8>) -> Scripted {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

fn ok(body: serde_json::Value) -> Scripted {
    Ok(TransportResponse {
        status: 200,
        body: body.to_string(),
    })
}

fn status(code: u16) -> Scripted {
    Ok(TransportResponse {
        status: code,
        body: format!("status {}", code),
    })
}

fn slim_person_response() -> serde_json::Value {
    json!({
        "responses": [{
            "labelAnnotations": [{ "description": "slim", "score": 0.9 }],
            "faceAnnotations": [{ "detectionConfidence": 0.97 }],
            "localizedObjectAnnotations": [{
                "name": "Person",
                "score": 0.93,
                "boundingPoly": {
                    "vertices": [
                        { "x": 100, "y": 40 },
                        { "x": 260, "y": 40 },
                        { "x": 260, "y": 380 },
                        { "x": 100, "y": 380 }
                    ]
                }
            }]
        }]
    })
}

fn configuration() -> Configuration {
    let mut configuration = Configuration::default();
    configuration.vision.api_key = "integration-key".to_string();
    configuration
}

fn analyzer(configuration: Configuration, transport: Arc<ScriptedTransport>) -> BodyAnalyzer {
    BodyAnalyzer::builder(configuration)
        .transport(transport)
        .build()
        .unwrap()
}

fn image() -> ImageRef {
    ImageRef::from_bytes(vec![0x5a; 600])
}

#[tokio::test(start_paused = true)]
async fn classifies_slim_person_with_capped_confidence() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    let result = analyzer.analyze(&image()).await.unwrap();

    assert_eq!(result.category(), BodyTypeCategory::Slim);
    assert_eq!(result.confidence(), 99);
    assert_eq!(result.height(), SizeClass::Large);
    assert_eq!(result.shoulder_width(), SizeClass::Large);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_detections_fall_back_to_default() {
    let transport = ScriptedTransport::always(ok(json!({ "responses": [{}] })));
    let analyzer = analyzer(configuration(), transport);

    let result = analyzer.analyze(&image()).await.unwrap();

    assert_eq!(result.category(), BodyTypeCategory::Average);
    assert_eq!(result.confidence(), 50);
}

#[tokio::test(start_paused = true)]
async fn recovers_after_transient_failures() {
    let transport = ScriptedTransport::new(
        vec![
            status(503),
            Err(ClassificationError::Network("connection reset".to_string())),
        ],
        ok(slim_person_response()),
    );
    let analyzer = analyzer(configuration(), transport.clone());
    let start = Instant::now();

    let result = analyzer.analyze(&image()).await.unwrap();

    assert_eq!(result.category(), BodyTypeCategory::Slim);
    assert_eq!(transport.calls(), 3);
    // linear backoff: 1s then 2s
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_last_error() {
    let transport = ScriptedTransport::new(vec![status(502), status(503)], status(500));
    let analyzer = analyzer(configuration(), transport.clone());

    let err = analyzer.analyze(&image()).await.unwrap_err();

    match err {
        AppError::Classification(ClassificationError::Remote { status, .. }) => {
            assert_eq!(status, 500)
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn client_errors_are_retried_too() {
    let transport = ScriptedTransport::always(status(400));
    let analyzer = analyzer(configuration(), transport.clone());

    let err = analyzer.analyze(&image()).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::Remote { status: 400, .. })
    ));
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn placeholder_credential_fails_fast() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = analyzer(Configuration::default(), transport.clone());
    let start = Instant::now();

    let err = analyzer.analyze(&image()).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::Config(_))
    ));
    assert_eq!(transport.calls(), 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn tiny_image_fails_fast() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    // 30 bytes encode to 40 base64 characters
    let err = analyzer
        .analyze(&ImageRef::from_bytes(vec![1u8; 30]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::InvalidImage {
            length: 40,
            minimum: 100
        })
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn unsupported_format_fails_fast() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    // QOI magic bytes
    let mut bytes = b"qoif".to_vec();
    bytes.resize(600, 0);
    let err = analyzer
        .analyze(&ImageRef::from_bytes(bytes))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::UnsupportedFormat(ref format)) if format == "Qoi"
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn unreadable_image_is_an_encoding_error() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    let err = analyzer
        .analyze(&ImageRef::Path("/nonexistent/photo.jpg".into()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Encoding(EncodingError::Unreadable { .. })
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_requests_time_out_per_attempt() {
    let transport = ScriptedTransport::slow(Duration::from_secs(120), ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    let err = analyzer.analyze(&image()).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::Network(ref msg)) if msg == "request timed out"
    ));
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_engages_lockout() {
    let transport = ScriptedTransport::new(vec![status(429), status(429), status(429)], ok(slim_person_response()));
    let analyzer = analyzer(configuration(), transport.clone());

    let err = analyzer.analyze(&image()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Classification(ClassificationError::Remote { status: 429, .. })
    ));
    assert_eq!(transport.calls(), 3);
    assert_eq!(
        analyzer.lockout_remaining().await,
        Some(Duration::from_secs(60))
    );

    let err = analyzer.analyze(&image()).await.unwrap_err();
    assert!(matches!(err, AppError::LockedOut(remaining) if remaining == Duration::from_secs(60)));
    assert_eq!(transport.calls(), 3);

    tokio::time::advance(Duration::from_secs(61)).await;
    let result = analyzer.analyze(&image()).await.unwrap();
    assert_eq!(result.category(), BodyTypeCategory::Slim);
    assert_eq!(transport.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn lockouts_are_not_shared_between_analyzers() {
    let limited = ScriptedTransport::always(status(429));
    let healthy = ScriptedTransport::always(ok(slim_person_response()));
    let first = analyzer(configuration(), limited);
    let second = analyzer(configuration(), healthy);

    assert!(first.analyze(&image()).await.is_err());
    assert!(first.lockout_remaining().await.is_some());

    assert!(second.lockout_remaining().await.is_none());
    assert!(second.analyze(&image()).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn disabled_lockout_keeps_calling_the_service() {
    let mut configuration = configuration();
    configuration.analysis.rate_limit_lockout_ms = 0;
    configuration.retry.max_attempts = 1;
    let transport = ScriptedTransport::always(status(429));
    let analyzer = analyzer(configuration, transport.clone());

    assert!(analyzer.analyze(&image()).await.is_err());
    assert!(analyzer.analyze(&image()).await.is_err());
    assert_eq!(transport.calls(), 2);
    assert_eq!(analyzer.lockout_remaining().await, None);
}

#[tokio::test(start_paused = true)]
async fn concurrent_analyses_run_independently() {
    let transport = ScriptedTransport::always(ok(slim_person_response()));
    let analyzer = Arc::new(analyzer(configuration(), transport.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = analyzer.clone();
            tokio::spawn(async move { analyzer.analyze(&image()).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.category(), BodyTypeCategory::Slim);
    }
    assert_eq!(transport.calls(), 4);
}

#[test]
fn invalid_configuration_is_rejected_at_build() {
    let mut configuration = configuration();
    configuration.analysis.weights.label = 0.9;

    let result = BodyAnalyzer::builder(configuration)
        .transport(ScriptedTransport::always(status(200)))
        .build();

    assert!(matches!(result, Err(AppError::Configuration(_))));
}
