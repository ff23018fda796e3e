pub mod classifier;
pub mod encoder;
pub mod recommendation;

pub use classifier::LabelClassifier;
pub use encoder::ImageEncoder;
pub use recommendation::{ApparelCategory, Recommendation, RecommendationCatalog};
