use crate::common::EncodedImage;
use crate::error::ClassificationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureKind {
    LabelDetection,
    FaceDetection,
    ObjectLocalization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub max_results: u32,
}

impl Feature {
    pub fn new(kind: FeatureKind, max_results: u32) -> Self {
        Self { kind, max_results }
    }
}

/// An encoded image plus the detections requested for it. Immutable once built.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    image: EncodedImage,
    features: Vec<Feature>,
}

impl ClassificationRequest {
    pub fn new(image: EncodedImage, features: Vec<Feature>) -> Self {
        Self { image, features }
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Serializes to the `images:annotate` request body.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: self.image.content(),
                },
                features: &self.features,
            }],
        };
        serde_json::to_vec(&body)
    }
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent<'a>,
    features: &'a [Feature],
}

#[derive(Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnnotateResponse {
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnnotateImageResponse {
    label_annotations: Vec<LabelAnnotation>,
    face_annotations: Vec<FaceAnnotation>,
    localized_object_annotations: Vec<LocalizedObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    pub description: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaceAnnotation {
    pub bounding_poly: Option<BoundingPoly>,
    pub detection_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedObject {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
    pub normalized_vertices: Vec<NormalizedVertex>,
}

// The API omits zero coordinates, hence the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedVertex {
    pub x: f64,
    pub y: f64,
}

/// Detections for one image, exactly as the remote classifier reported them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetectionResult {
    pub labels: Vec<LabelAnnotation>,
    pub faces: Vec<FaceAnnotation>,
    pub objects: Vec<LocalizedObject>,
}

impl RawDetectionResult {
    /// Parses an `images:annotate` response body, keeping only the first image's detections.
    pub fn from_response_body(body: &str) -> Result<Self, ClassificationError> {
        let response: AnnotateResponse = serde_json::from_str(body)
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

        let first = response.responses.into_iter().next().ok_or_else(|| {
            ClassificationError::MalformedResponse("response contains no results".to_string())
        })?;

        Ok(Self {
            labels: first.label_annotations,
            faces: first.face_annotations,
            objects: first.localized_object_annotations,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.faces.is_empty() && self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn request_body_matches_annotate_shape() {
        let request = ClassificationRequest::new(
            EncodedImage::new("aGVsbG8=", None),
            vec![
                Feature::new(FeatureKind::LabelDetection, 20),
                Feature::new(FeatureKind::FaceDetection, 1),
            ],
        );
        let body: Value = serde_json::from_slice(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "requests": [{
                    "image": { "content": "aGVsbG8=" },
                    "features": [
                        { "type": "LABEL_DETECTION", "maxResults": 20 },
                        { "type": "FACE_DETECTION", "maxResults": 1 }
                    ]
                }]
            })
        );
    }

    #[test]
    fn parses_full_response() {
        let body = json!({
            "responses": [{
                "labelAnnotations": [
                    { "mid": "/m/01", "description": "Slender build", "score": 0.91, "topicality": 0.9 }
                ],
                "faceAnnotations": [
                    { "detectionConfidence": 0.98, "boundingPoly": { "vertices": [{ "x": 10, "y": 12 }] } }
                ],
                "localizedObjectAnnotations": [
                    {
                        "name": "Person",
                        "score": 0.87,
                        "boundingPoly": { "normalizedVertices": [{ "x": 0.1, "y": 0.2 }] }
                    }
                ]
            }]
        })
        .to_string();

        let raw = RawDetectionResult::from_response_body(&body).unwrap();
        assert_eq!(raw.labels[0].description, "Slender build");
        assert_eq!(raw.labels[0].score, 0.91);
        assert_eq!(raw.faces.len(), 1);
        assert_eq!(raw.objects[0].name, "Person");
        let poly = raw.objects[0].bounding_poly.as_ref().unwrap();
        assert!(poly.vertices.is_empty());
        assert_eq!(poly.normalized_vertices.len(), 1);
    }

    #[test]
    fn missing_annotation_lists_are_empty() {
        let raw = RawDetectionResult::from_response_body(r#"{"responses":[{}]}"#).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn omitted_coordinates_default_to_zero() {
        let vertex: Vertex = serde_json::from_str(r#"{"y": 40}"#).unwrap();
        assert_eq!(vertex, Vertex { x: 0, y: 40 });
    }

    #[test]
    fn empty_or_invalid_bodies_are_malformed() {
        assert!(matches!(
            RawDetectionResult::from_response_body(r#"{"responses":[]}"#),
            Err(ClassificationError::MalformedResponse(_))
        ));
        assert!(matches!(
            RawDetectionResult::from_response_body("<html>"),
            Err(ClassificationError::MalformedResponse(_))
        ));
    }
}
