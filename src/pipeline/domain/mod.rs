pub mod analysis;
pub mod body_type;

pub use analysis::AnalysisResult;
pub use body_type::{BodyTypeCategory, SizeClass};
