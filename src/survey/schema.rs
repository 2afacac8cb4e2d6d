//! Survey file schema and deserialization

use crate::aggregator::WeightTable;
use crate::{CategoryCount, Item};
use serde::{Deserialize, Serialize};

/// Survey shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyKind {
    /// Rank-distribution table, scored with a weight table
    Ranking,
    /// Counts and reported percentages per answer
    Categorical,
}

impl std::fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyKind::Ranking => write!(f, "ranking"),
            SurveyKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Root structure of a `*.survey.json` file.
///
/// Both shapes share one flat struct so that rank keys (`"1"`, `"2"`, ...)
/// are read straight from the JSON text; `kind` decides which fields are
/// allowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SurveyFile {
    pub kind: SurveyKind,

    /// Short name (default: file name without `.survey.json`)
    #[serde(default)]
    pub name: Option<String>,

    /// Human-readable title (default: the name)
    #[serde(default)]
    pub title: Option<String>,

    /// Ranking only: label for the score column (default: "Weighted Score")
    #[serde(default)]
    pub score_label: Option<String>,

    /// Ranking only: rank percentages at or below this are left unlabeled (default: 5)
    #[serde(default)]
    pub label_threshold: Option<f64>,

    /// Ranking only: weight per rank (default: linear over the highest rank present)
    #[serde(default)]
    pub weights: Option<WeightTable>,

    /// Ranking only
    #[serde(default)]
    pub items: Vec<Item>,

    /// Categorical only
    #[serde(default)]
    pub categories: Vec<CategoryCount>,
}
