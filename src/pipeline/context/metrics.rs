use std::time::Duration;

/// Per-stage durations of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisMetrics {
    encode_duration: Option<Duration>,
    request_duration: Option<Duration>,
    classify_duration: Option<Duration>,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_encode_duration(&mut self, duration: Duration) {
        self.encode_duration = Some(duration);
    }

    pub fn record_request_duration(&mut self, duration: Duration) {
        self.request_duration = Some(duration);
    }

    pub fn record_classify_duration(&mut self, duration: Duration) {
        self.classify_duration = Some(duration);
    }

    pub fn encode_duration(&self) -> Option<Duration> {
        self.encode_duration
    }

    pub fn request_duration(&self) -> Option<Duration> {
        self.request_duration
    }

    pub fn classify_duration(&self) -> Option<Duration> {
        self.classify_duration
    }

    pub fn total(&self) -> Duration {
        [
            self.encode_duration,
            self.request_duration,
            self.classify_duration,
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}
