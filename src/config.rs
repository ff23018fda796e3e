use crate::error::ConfigurationError;
use crate::network::retry::RetryPolicy;
use crate::pipeline::domain::BodyTypeCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_CLOUD_API_KEY";
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Legacy variable the mobile build read the vision key from.
const LEGACY_API_KEY_VAR: &str = "GOOGLE_CLOUD_API_KEY";
const ENV_PREFIX: &str = "BODYFIT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub vision: VisionSettings,
    pub retry: RetrySettings,
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub api_key: String,
    pub endpoint: String,
    /// 0 disables the per-attempt timeout.
    pub request_timeout_ms: u64,
    pub min_image_length: usize,
    pub label_max_results: u32,
    pub face_max_results: u32,
    pub object_max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub base_score: f64,
    pub weights: ConfidenceWeights,
    /// Object name that counts as a person; compared exactly.
    pub person_class: String,
    /// Priority order: the first category with a matching keyword wins.
    pub keywords: Vec<CategoryKeywords>,
    pub default_category: BodyTypeCategory,
    pub size_thresholds: SizeThresholds,
    /// 0 disables the lockout after a rate-limit response.
    pub rate_limit_lockout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub label: f64,
    pub face: f64,
    pub object: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: BodyTypeCategory,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub height: Bounds,
    pub width: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub small: i32,
    pub large: i32,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            request_timeout_ms: 30_000,
            min_image_length: 100,
            label_max_results: 20,
            face_max_results: 1,
            object_max_results: 10,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            weights: ConfidenceWeights::default(),
            person_class: "Person".to_string(),
            keywords: BodyTypeCategory::ALL
                .iter()
                .map(|category| CategoryKeywords {
                    category: *category,
                    keywords: category
                        .default_keywords()
                        .iter()
                        .map(|k| k.to_string())
                        .collect(),
                })
                .collect(),
            default_category: BodyTypeCategory::Average,
            size_thresholds: SizeThresholds::default(),
            rate_limit_lockout_ms: 60_000,
        }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            label: 0.4,
            face: 0.3,
            object: 0.3,
        }
    }
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            height: Bounds {
                small: 200,
                large: 300,
            },
            width: Bounds {
                small: 100,
                large: 150,
            },
        }
    }
}

impl VisionSettings {
    /// True when a real key has replaced the placeholder.
    pub fn has_credential(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl AnalysisSettings {
    pub fn rate_limit_lockout(&self) -> Option<Duration> {
        (self.rate_limit_lockout_ms > 0).then(|| Duration::from_millis(self.rate_limit_lockout_ms))
    }
}

impl Configuration {
    /// Layers defaults, the legacy key variable, an optional file and
    /// `BODYFIT_*` environment variables, later sources winning.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Ok(key) = std::env::var(LEGACY_API_KEY_VAR) {
            builder = builder.set_default("vision.api_key", key)?;
        }

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let configuration: Configuration = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(configuration)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.vision.endpoint.trim().is_empty() {
            return Err("Vision endpoint must not be empty".to_string());
        }

        if self.vision.min_image_length == 0 {
            return Err("Minimum image length must be greater than 0".to_string());
        }

        if self.retry.max_attempts == 0 {
            return Err("Max attempts must be greater than 0".to_string());
        }

        let weights = &self.analysis.weights;
        for (name, weight) in [
            ("label", weights.label),
            ("face", weights.face),
            ("object", weights.object),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("{} weight must be between 0.0 and 1.0", name));
            }
        }

        let total = weights.label + weights.face + weights.object;
        if (total - 1.0).abs() > 1e-6 {
            return Err(format!("Confidence weights must sum to 1.0, got {}", total));
        }

        if self.analysis.keywords.is_empty() {
            return Err("At least one category keyword set must be configured".to_string());
        }

        for entry in &self.analysis.keywords {
            if entry.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(format!("Empty keyword configured for {}", entry.category));
            }
        }

        let thresholds = &self.analysis.size_thresholds;
        if thresholds.height.small > thresholds.height.large
            || thresholds.width.small > thresholds.width.large
        {
            return Err("Small size thresholds must not exceed large thresholds".to_string());
        }

        Ok(())
    }
}
