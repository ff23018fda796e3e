pub mod client;
pub mod service;
pub mod types;

pub use client::VisionClient;
pub use service::VisionService;
pub use types::{
    BoundingPoly, ClassificationRequest, FaceAnnotation, Feature, FeatureKind, LabelAnnotation,
    LocalizedObject, NormalizedVertex, RawDetectionResult, Vertex,
};
