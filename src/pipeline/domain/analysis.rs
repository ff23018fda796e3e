use super::body_type::{BodyTypeCategory, SizeClass};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one successful analysis. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    category: BodyTypeCategory,
    confidence: u8,
    height: SizeClass,
    shoulder_width: SizeClass,
    analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub const MAX_CONFIDENCE: u8 = 99;

    pub fn new(
        category: BodyTypeCategory,
        confidence: u8,
        height: SizeClass,
        shoulder_width: SizeClass,
    ) -> Self {
        Self {
            category,
            confidence: confidence.min(Self::MAX_CONFIDENCE),
            height,
            shoulder_width,
            analyzed_at: Utc::now(),
        }
    }

    pub fn category(&self) -> BodyTypeCategory {
        self.category
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn height(&self) -> SizeClass {
        self.height
    }

    pub fn shoulder_width(&self) -> SizeClass {
        self.shoulder_width
    }

    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }
}
