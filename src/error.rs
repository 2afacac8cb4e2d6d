//! Errors raised while building or scoring survey data

use thiserror::Error;

/// Errors from the scoring core and its input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    /// An item's distribution omits a rank that the weight table requires
    #[error("missing rank data: item '{item}' has no fraction for rank {rank}")]
    MissingRankData { item: String, rank: u8 },

    /// Two items or categories in one survey share a label
    #[error("duplicate label: '{0}' appears more than once")]
    DuplicateItem(String),

    /// Lookup of an item the aggregator does not hold
    #[error("unknown item: '{0}'")]
    UnknownItem(String),

    #[error("weight table is empty")]
    EmptyWeightTable,

    /// Weight at `rank` is not strictly below the weight of the rank before it
    #[error("weights must strictly decrease with rank (rank {rank} breaks the order)")]
    WeightsNotDecreasing { rank: u8 },

    #[error("weight {value} for rank {rank} is not a finite number")]
    NonFiniteWeight { rank: u8, value: f64 },

    #[error("fraction {value} for rank {rank} is outside [0, 1]")]
    FractionOutOfRange { rank: u8, value: f64 },

    /// Rank positions start at 1 and fit in a byte
    #[error("invalid rank position {0} (ranks run from 1 to 255)")]
    InvalidRank(usize),

    /// Built-in catalogue lookup miss
    #[error("unknown survey '{0}' (run `surveyrank list` to see built-in surveys)")]
    UnknownSurvey(String),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
