//! Rank weight tables

use crate::error::{Result, SurveyError};
use crate::Rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight assigned to each rank position.
///
/// Weights strictly decrease as the rank number grows, so rank 1 always
/// carries the most weight. The table's rank set is what an item must
/// cover to be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Rank, f64>",
    into = "BTreeMap<Rank, f64>"
)]
pub struct WeightTable(BTreeMap<Rank, f64>);

impl WeightTable {
    pub fn new(weights: BTreeMap<Rank, f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(SurveyError::EmptyWeightTable);
        }

        let mut previous: Option<f64> = None;
        for (rank, weight) in &weights {
            if !weight.is_finite() {
                return Err(SurveyError::NonFiniteWeight {
                    rank: rank.get(),
                    value: *weight,
                });
            }
            if let Some(prev) = previous {
                if *weight >= prev {
                    return Err(SurveyError::WeightsNotDecreasing { rank: rank.get() });
                }
            }
            previous = Some(*weight);
        }

        Ok(Self(weights))
    }

    /// Linear table over `ranks` positions: rank 1 weighs `ranks`, the last rank weighs 1
    pub fn linear(ranks: u8) -> Result<Self> {
        let mut weights = BTreeMap::new();
        for position in 1..=ranks {
            weights.insert(Rank::new(position)?, f64::from(ranks - position + 1));
        }
        Self::new(weights)
    }

    /// Build from weights listed in rank order, starting at rank 1
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (index, weight) in weights.iter().enumerate() {
            map.insert(Rank::from_index(index)?, *weight);
        }
        Self::new(map)
    }

    pub fn weight(&self, rank: Rank) -> Option<f64> {
        self.0.get(&rank).copied()
    }

    pub fn covers(&self, rank: Rank) -> bool {
        self.0.contains_key(&rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, f64)> + '_ {
        self.0.iter().map(|(rank, weight)| (*rank, *weight))
    }

    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed table
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.0.keys().next_back().copied()
    }
}

impl TryFrom<BTreeMap<Rank, f64>> for WeightTable {
    type Error = SurveyError;

    fn try_from(weights: BTreeMap<Rank, f64>) -> Result<Self> {
        WeightTable::new(weights)
    }
}

impl From<WeightTable> for BTreeMap<Rank, f64> {
    fn from(table: WeightTable) -> Self {
        table.0
    }
}
