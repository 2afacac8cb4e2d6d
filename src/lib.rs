//! surveyrank: weighted-rank scoring and ranked summaries for survey results
//!
//! Survey tables come in two shapes: rank distributions (what fraction of
//! respondents put each item at each preference rank) and categorical
//! tallies (how many respondents picked each answer). This crate collapses
//! rank distributions into one weighted score per item, orders both shapes
//! deterministically, and checks the data for obvious quality problems.

pub mod aggregator;
pub mod analyzer;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod quality;
pub mod reporter;
pub mod survey;
pub mod tally;
pub mod watcher;

pub use aggregator::{RankAggregator, WeightTable};
pub use error::SurveyError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A preference rank position. Rank 1 is the most preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const FIRST: Rank = Rank(1);

    pub fn new(position: u8) -> error::Result<Self> {
        if position == 0 {
            return Err(SurveyError::InvalidRank(0));
        }
        Ok(Self(position))
    }

    /// Rank for a zero-based column index (index 0 is rank 1)
    pub fn from_index(index: usize) -> error::Result<Self> {
        let position =
            u8::try_from(index + 1).map_err(|_| SurveyError::InvalidRank(index + 1))?;
        Self::new(position)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = SurveyError;

    fn try_from(position: u8) -> error::Result<Self> {
        Rank::new(position)
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fraction of respondents that placed one item at each rank.
///
/// Fractions are checked to lie in [0, 1] but are not normalized; a
/// distribution whose fractions do not sum to 1.0 is reported by the
/// data-quality checks, never corrected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Rank, f64>",
    into = "BTreeMap<Rank, f64>"
)]
pub struct RankDistribution(BTreeMap<Rank, f64>);

impl RankDistribution {
    pub fn new(fractions: BTreeMap<Rank, f64>) -> error::Result<Self> {
        for (rank, value) in &fractions {
            if !(0.0..=1.0).contains(value) {
                return Err(SurveyError::FractionOutOfRange {
                    rank: rank.get(),
                    value: *value,
                });
            }
        }
        Ok(Self(fractions))
    }

    /// Build from fractions listed in rank order, starting at rank 1
    pub fn from_fractions(fractions: &[f64]) -> error::Result<Self> {
        let mut map = BTreeMap::new();
        for (index, fraction) in fractions.iter().enumerate() {
            map.insert(Rank::from_index(index)?, *fraction);
        }
        Self::new(map)
    }

    pub fn fraction(&self, rank: Rank) -> Option<f64> {
        self.0.get(&rank).copied()
    }

    /// Sum of all fractions (≈1.0 for well-formed data)
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, f64)> + '_ {
        self.0.iter().map(|(rank, fraction)| (*rank, *fraction))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<Rank, f64>> for RankDistribution {
    type Error = SurveyError;

    fn try_from(fractions: BTreeMap<Rank, f64>) -> error::Result<Self> {
        RankDistribution::new(fractions)
    }
}

impl From<RankDistribution> for BTreeMap<Rank, f64> {
    fn from(distribution: RankDistribution) -> Self {
        distribution.0
    }
}

/// A ranked survey item: a label and how respondents ranked it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
    pub distribution: RankDistribution,
}

impl Item {
    pub fn new(label: impl Into<String>, distribution: RankDistribution) -> Self {
        Self {
            label: label.into(),
            distribution,
        }
    }
}

/// One rank's share of an item's weighted score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankContribution {
    pub rank: Rank,
    /// Fraction of respondents at this rank
    pub fraction: f64,
    /// Weight the table assigns to this rank
    pub weight: f64,
    /// fraction × weight
    pub contribution: f64,
}

/// An item with its weighted score, as produced by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub label: String,
    /// Weighted score: sum of all contributions
    pub score: f64,
    /// Per-rank contributions, in rank order
    pub contributions: Vec<RankContribution>,
    /// Fractions at ranks the weight table does not weight
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unweighted: BTreeMap<Rank, f64>,
}

impl RankedItem {
    /// Fraction of respondents that put this item at `rank`
    pub fn fraction(&self, rank: Rank) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.rank == rank)
            .map(|c| c.fraction)
    }
}

/// A categorical answer with its respondent count and reported percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u32,
    /// Percentage as reported by the survey tool (whole percent)
    pub percent: u32,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u32, percent: u32) -> Self {
        Self {
            label: label.into(),
            count,
            percent,
        }
    }
}

/// A categorical answer in ranked output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub label: String,
    pub count: u32,
    /// Reported percentage
    pub percent: u32,
    /// Percentage recomputed from counts (count / total × 100)
    pub count_share: f64,
}

/// Severity levels for data-quality findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Data-quality checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Rank fractions of an item do not sum to ≈1.0
    DistributionSum,
    /// Distribution carries a rank the weight table does not weight
    UnweightedRank,
    /// Reported percentages do not sum to ≈100
    PercentSum,
    /// Survey has no items or categories
    EmptySurvey,
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Check::DistributionSum => "distribution-sum",
            Check::UnweightedRank => "unweighted-rank",
            Check::PercentSum => "percent-sum",
            Check::EmptySurvey => "empty-survey",
        };
        write!(f, "{}", s)
    }
}

/// A data-quality finding. Findings never change scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub check: Check,
    pub severity: Severity,
    pub message: String,
    /// Item or category the finding is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// The result of analyzing one survey
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyReport {
    /// Short name (catalogue slug or file-given name)
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// File the survey was loaded from (None for built-ins)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Ranked output
    pub body: ReportBody,
    /// Data-quality findings
    pub findings: Vec<Finding>,
}

impl SurveyReport {
    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

/// Ranked output, by survey kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportBody {
    #[serde(rename_all = "camelCase")]
    Ranking {
        /// Label for the score column ("Weighted Score", "Priority Score")
        score_label: String,
        /// Rank percentages at or below this value are left unlabeled in charts
        label_threshold: f64,
        weights: WeightTable,
        /// Items, highest score first
        ranked: Vec<RankedItem>,
    },
    #[serde(rename_all = "camelCase")]
    Categorical {
        total_responses: u32,
        /// Categories, highest percentage first
        ranked: Vec<CategoryShare>,
    },
}

impl ReportBody {
    pub fn kind(&self) -> &'static str {
        match self {
            ReportBody::Ranking { .. } => "ranking",
            ReportBody::Categorical { .. } => "categorical",
        }
    }
}
