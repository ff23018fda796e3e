use crate::common::EncodedImage;
use crate::network::vision::RawDetectionResult;
use crate::pipeline::context::metrics::AnalysisMetrics;
use crate::pipeline::context::state::{
    ClassifiedState, DetectedState, EncodedState, PendingState, ProcessingState,
};
use crate::pipeline::domain::AnalysisResult;
use std::time::Instant;
use uuid::Uuid;

// AnalysisContext with compile-time stage tracking via the state parameter
pub struct AnalysisContext<S> {
    run_id: Uuid,
    metrics: AnalysisMetrics,
    stage_start: Instant,
    state: S,
}

impl<S: ProcessingState> AnalysisContext<S> {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn metrics(&self) -> &AnalysisMetrics {
        &self.metrics
    }

    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }

    fn advance<N>(self, metrics: AnalysisMetrics, state: N) -> AnalysisContext<N> {
        AnalysisContext {
            run_id: self.run_id,
            metrics,
            stage_start: Instant::now(),
            state,
        }
    }
}

impl AnalysisContext<PendingState> {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            metrics: AnalysisMetrics::new(),
            stage_start: Instant::now(),
            state: PendingState,
        }
    }

    pub fn into_encoded(self, image: EncodedImage) -> AnalysisContext<EncodedState> {
        let mut metrics = self.metrics.clone();
        metrics.record_encode_duration(self.stage_start.elapsed());
        self.advance(metrics, EncodedState { image })
    }
}

impl AnalysisContext<EncodedState> {
    pub fn image(&self) -> &EncodedImage {
        &self.state.image
    }

    pub fn into_detected(self, detections: RawDetectionResult) -> AnalysisContext<DetectedState> {
        let mut metrics = self.metrics.clone();
        metrics.record_request_duration(self.stage_start.elapsed());
        self.advance(metrics, DetectedState { detections })
    }
}

impl AnalysisContext<DetectedState> {
    pub fn detections(&self) -> &RawDetectionResult {
        &self.state.detections
    }

    pub fn into_classified(self, result: AnalysisResult) -> AnalysisContext<ClassifiedState> {
        let mut metrics = self.metrics.clone();
        metrics.record_classify_duration(self.stage_start.elapsed());
        self.advance(metrics, ClassifiedState { result })
    }
}

impl AnalysisContext<ClassifiedState> {
    pub fn result(&self) -> &AnalysisResult {
        &self.state.result
    }

    pub fn into_result(self) -> AnalysisResult {
        self.state.result
    }
}
