use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of body types the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyTypeCategory {
    Slim,
    #[default]
    Average,
    Full,
    Athletic,
}

impl BodyTypeCategory {
    pub const ALL: [BodyTypeCategory; 4] = [
        BodyTypeCategory::Slim,
        BodyTypeCategory::Average,
        BodyTypeCategory::Full,
        BodyTypeCategory::Athletic,
    ];

    /// Label shown to shoppers.
    pub fn label(&self) -> &'static str {
        match self {
            BodyTypeCategory::Slim => "슬림",
            BodyTypeCategory::Average => "보통",
            BodyTypeCategory::Full => "통통",
            BodyTypeCategory::Athletic => "운동체형",
        }
    }

    /// Keywords matched against lower-cased vision labels, in match order.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            BodyTypeCategory::Slim => &["slim", "thin", "slender", "lean", "skinny", "petite"],
            BodyTypeCategory::Average => &["average", "normal", "medium", "regular", "standard"],
            BodyTypeCategory::Full => &[
                "full",
                "curvy",
                "plus size",
                "round",
                "chubby",
                "full-figured",
            ],
            BodyTypeCategory::Athletic => &[
                "athletic",
                "muscular",
                "fit",
                "toned",
                "sporty",
                "athletic build",
            ],
        }
    }
}

impl fmt::Display for BodyTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyTypeCategory::Slim => "slim",
            BodyTypeCategory::Average => "average",
            BodyTypeCategory::Full => "full",
            BodyTypeCategory::Athletic => "athletic",
        };
        f.write_str(name)
    }
}

/// Coarse size bucket for a measured extent of the detected person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Small => "작음",
            SizeClass::Medium => "보통",
            SizeClass::Large => "큼",
        }
    }
}
