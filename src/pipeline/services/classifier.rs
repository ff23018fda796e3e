use crate::config::{AnalysisSettings, Bounds, ConfidenceWeights, SizeThresholds};
use crate::network::vision::{LocalizedObject, RawDetectionResult, Vertex};
use crate::pipeline::domain::{AnalysisResult, BodyTypeCategory, SizeClass};
use indexmap::IndexMap;

/// Maps raw detections to a body type and a confidence score.
/// Pure: no I/O, same input gives the same category and confidence.
#[derive(Debug, Clone)]
pub struct LabelClassifier {
    keywords: IndexMap<BodyTypeCategory, Vec<String>>,
    default_category: BodyTypeCategory,
    base_score: f64,
    weights: ConfidenceWeights,
    person_class: String,
    size_thresholds: SizeThresholds,
}

impl Default for LabelClassifier {
    fn default() -> Self {
        Self::new(&AnalysisSettings::default())
    }
}

impl LabelClassifier {
    pub fn new(settings: &AnalysisSettings) -> Self {
        let mut keywords: IndexMap<BodyTypeCategory, Vec<String>> = IndexMap::new();
        for entry in &settings.keywords {
            keywords
                .entry(entry.category)
                .or_default()
                .extend(entry.keywords.iter().map(|k| k.to_lowercase()));
        }

        Self {
            keywords,
            default_category: settings.default_category,
            base_score: settings.base_score,
            weights: settings.weights,
            person_class: settings.person_class.clone(),
            size_thresholds: settings.size_thresholds,
        }
    }

    pub fn classify(&self, raw: &RawDetectionResult) -> AnalysisResult {
        let person = self.first_person(&raw.objects);
        let vertices = person
            .and_then(|p| p.bounding_poly.as_ref())
            .map(|poly| poly.vertices.as_slice())
            .unwrap_or_default();

        AnalysisResult::new(
            self.category(raw),
            self.confidence(raw),
            Self::height_class(vertices, &self.size_thresholds.height),
            Self::width_class(vertices, &self.size_thresholds.width),
        )
    }

    /// First category, in priority order, with a keyword contained in any label.
    pub fn category(&self, raw: &RawDetectionResult) -> BodyTypeCategory {
        let labels: Vec<String> = raw
            .labels
            .iter()
            .map(|label| label.description.to_lowercase())
            .collect();

        self.keywords
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|keyword| labels.iter().any(|label| label.contains(keyword.as_str())))
            })
            .map(|(category, _)| *category)
            .unwrap_or(self.default_category)
    }

    /// Base score plus weighted signals, rounded and clamped to 0..=99.
    pub fn confidence(&self, raw: &RawDetectionResult) -> u8 {
        let mut confidence = self.base_score;

        if !raw.labels.is_empty() {
            let mean = raw.labels.iter().map(|label| label.score).sum::<f64>()
                / raw.labels.len() as f64;
            confidence += mean * self.weights.label * 100.0;
        }

        if !raw.faces.is_empty() {
            confidence += self.weights.face * 100.0;
        }

        if self.first_person(&raw.objects).is_some() {
            confidence += self.weights.object * 100.0;
        }

        // NaN saturates to 0 on the cast
        confidence
            .round()
            .clamp(0.0, AnalysisResult::MAX_CONFIDENCE as f64) as u8
    }

    fn first_person<'a>(&self, objects: &'a [LocalizedObject]) -> Option<&'a LocalizedObject> {
        objects
            .iter()
            .find(|object| object.name == self.person_class)
    }

    // top-left to bottom-left
    fn height_class(vertices: &[Vertex], bounds: &Bounds) -> SizeClass {
        match vertices {
            [top, _, _, bottom, ..] => {
                Self::size_class(i64::from(bottom.y) - i64::from(top.y), bounds)
            }
            _ => SizeClass::Medium,
        }
    }

    // top-left to top-right
    fn width_class(vertices: &[Vertex], bounds: &Bounds) -> SizeClass {
        match vertices {
            [left, right, ..] => {
                Self::size_class(i64::from(right.x) - i64::from(left.x), bounds)
            }
            _ => SizeClass::Medium,
        }
    }

    // i64: remote coordinates span the whole i32 range
    fn size_class(extent: i64, bounds: &Bounds) -> SizeClass {
        if extent > i64::from(bounds.large) {
            SizeClass::Large
        } else if extent < i64::from(bounds.small) {
            SizeClass::Small
        } else {
            SizeClass::Medium
        }
    }
}
