pub mod context;
pub mod domain;
pub mod orchestration;
pub mod services;

pub use domain::{AnalysisResult, BodyTypeCategory, SizeClass};
pub use orchestration::{BodyAnalyzer, BodyAnalyzerBuilder};
pub use services::{ImageEncoder, LabelClassifier, Recommendation, RecommendationCatalog};
