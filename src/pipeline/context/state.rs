use crate::common::EncodedImage;
use crate::network::vision::RawDetectionResult;
use crate::pipeline::domain::AnalysisResult;

// Markers to track the state of one analysis run
pub struct PendingState;
pub struct EncodedState {
    pub(super) image: EncodedImage,
}
pub struct DetectedState {
    pub(super) detections: RawDetectionResult,
}
pub struct ClassifiedState {
    pub(super) result: AnalysisResult,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for PendingState {
    fn state_name() -> &'static str {
        "Pending"
    }
}

impl ProcessingState for EncodedState {
    fn state_name() -> &'static str {
        "Encoded"
    }
}

impl ProcessingState for DetectedState {
    fn state_name() -> &'static str {
        "Detected"
    }
}

impl ProcessingState for ClassifiedState {
    fn state_name() -> &'static str {
        "Classified"
    }
}
