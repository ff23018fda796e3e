pub mod common;
pub mod config;
pub mod error;
pub mod network;
pub mod pipeline;

pub use common::{EncodedImage, ImageRef};
pub use config::Configuration;
pub use error::{AppError, ClassificationError, ConfigurationError, EncodingError};
pub use network::{HttpTransport, RetryPolicy, TransportResponse, VisionTransport};
pub use pipeline::{AnalysisResult, BodyAnalyzer, BodyTypeCategory, RecommendationCatalog};
