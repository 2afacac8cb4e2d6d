//! Weighted-rank scoring
//!
//! Collapses each item's rank distribution into one score,
//! `Σ fraction[rank] × weight[rank]` over the ranks of the weight table,
//! and orders items by that score. Ties are broken by label so the order
//! never depends on input order.

mod weights;

pub use weights::WeightTable;

use crate::error::{Result, SurveyError};
use crate::{Item, RankContribution, RankedItem};
use std::cmp::Ordering;

/// Scores and ranks a fixed set of items against one weight table
#[derive(Debug, Clone)]
pub struct RankAggregator {
    weights: WeightTable,
    items: Vec<Item>,
}

impl RankAggregator {
    pub fn new(weights: WeightTable, items: Vec<Item>) -> Self {
        Self { weights, items }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Weighted score of the item with the given label
    pub fn compute_weighted_score(&self, label: &str) -> Result<f64> {
        let item = self
            .items
            .iter()
            .find(|item| item.label == label)
            .ok_or_else(|| SurveyError::UnknownItem(label.to_string()))?;
        Ok(self.score_item(item)?.score)
    }

    /// Score one item, keeping the per-rank contributions.
    ///
    /// Fails with [`SurveyError::MissingRankData`] on the first weighted rank
    /// the item's distribution does not cover. Ranks the table does not
    /// weight are left out of the score and kept in `unweighted`.
    pub fn score_item(&self, item: &Item) -> Result<RankedItem> {
        let mut contributions = Vec::with_capacity(self.weights.len());
        for (rank, weight) in self.weights.iter() {
            let fraction = item.distribution.fraction(rank).ok_or_else(|| {
                SurveyError::MissingRankData {
                    item: item.label.clone(),
                    rank: rank.get(),
                }
            })?;
            contributions.push(RankContribution {
                rank,
                fraction,
                weight,
                contribution: fraction * weight,
            });
        }

        let unweighted = item
            .distribution
            .iter()
            .filter(|(rank, _)| !self.weights.covers(*rank))
            .collect();

        let score = contributions.iter().map(|c| c.contribution).sum();
        Ok(RankedItem {
            label: item.label.clone(),
            score,
            contributions,
            unweighted,
        })
    }

    /// All items, highest score first. No partial result on failure.
    pub fn rank_items(&self) -> Result<Vec<RankedItem>> {
        let mut ranked = self
            .items
            .iter()
            .map(|item| self.score_item(item))
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(compare_ranked);

        log::debug!(
            "ranked {} items over {} weighted ranks",
            ranked.len(),
            self.weights.len()
        );
        Ok(ranked)
    }
}

/// Descending score, then ascending label
fn compare_ranked(a: &RankedItem, b: &RankedItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.label.cmp(&b.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, RankDistribution};

    fn item(label: &str, fractions: &[f64]) -> Item {
        Item::new(label, RankDistribution::from_fractions(fractions).unwrap())
    }

    #[test]
    fn test_two_rank_dot_product() {
        let weights = WeightTable::from_weights(&[2.0, 1.0]).unwrap();
        let agg = RankAggregator::new(weights, vec![item("a", &[0.5, 0.5])]);
        let score = agg.compute_weighted_score("a").unwrap();
        assert!((score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_ease_of_use_fixture() {
        let agg = RankAggregator::new(
            WeightTable::linear(6).unwrap(),
            vec![item("Ease of use", &[0.34, 0.23, 0.05, 0.16, 0.05, 0.16])],
        );
        let score = agg.compute_weighted_score("Ease of use").unwrap();
        assert!((score - 4.13).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_missing_rank_fails() {
        let weights = WeightTable::from_weights(&[2.0, 1.0]).unwrap();
        let agg = RankAggregator::new(weights, vec![item("a", &[1.0])]);
        assert_eq!(
            agg.compute_weighted_score("a"),
            Err(SurveyError::MissingRankData {
                item: "a".to_string(),
                rank: 2
            })
        );
    }

    #[test]
    fn test_missing_rank_aborts_ranking() {
        let weights = WeightTable::from_weights(&[2.0, 1.0]).unwrap();
        let agg = RankAggregator::new(
            weights,
            vec![item("complete", &[0.5, 0.5]), item("short", &[1.0])],
        );
        assert!(matches!(
            agg.rank_items(),
            Err(SurveyError::MissingRankData { ref item, rank: 2 }) if item == "short"
        ));
    }

    #[test]
    fn test_unknown_item() {
        let agg = RankAggregator::new(WeightTable::linear(2).unwrap(), vec![]);
        assert_eq!(
            agg.compute_weighted_score("nope"),
            Err(SurveyError::UnknownItem("nope".to_string()))
        );
    }

    #[test]
    fn test_extra_rank_ignored() {
        let weights = WeightTable::from_weights(&[2.0, 1.0]).unwrap();
        let agg = RankAggregator::new(weights, vec![item("a", &[0.5, 0.3, 0.2])]);
        let ranked = agg.rank_items().unwrap();
        assert_eq!(ranked[0].contributions.len(), 2);
        assert!((ranked[0].score - 1.3).abs() < 1e-9);
        let third = Rank::new(3).unwrap();
        assert_eq!(ranked[0].unweighted.len(), 1);
        assert_eq!(ranked[0].unweighted.get(&third), Some(&0.2));
    }

    #[test]
    fn test_rank_order_descending() {
        let agg = RankAggregator::new(
            WeightTable::linear(2).unwrap(),
            vec![
                item("low", &[0.1, 0.9]),
                item("high", &[0.9, 0.1]),
                item("mid", &[0.5, 0.5]),
            ],
        );
        let labels: Vec<_> = agg
            .rank_items()
            .unwrap()
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_broken_by_label() {
        let agg = RankAggregator::new(
            WeightTable::linear(2).unwrap(),
            vec![item("zeta", &[0.5, 0.5]), item("alpha", &[0.5, 0.5])],
        );
        let ranked = agg.rank_items().unwrap();
        assert_eq!(ranked[0].label, "alpha");
        assert_eq!(ranked[1].label, "zeta");
    }

    #[test]
    fn test_contributions_sum_to_score() {
        let agg = RankAggregator::new(
            WeightTable::linear(3).unwrap(),
            vec![item("a", &[0.2, 0.3, 0.5])],
        );
        let ranked = agg.rank_items().unwrap();
        let sum: f64 = ranked[0].contributions.iter().map(|c| c.contribution).sum();
        assert_eq!(sum, ranked[0].score);
        assert_eq!(ranked[0].fraction(crate::Rank::FIRST), Some(0.2));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::{Rank, RankDistribution};
    use proptest::prelude::*;

    fn survey(ranks: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(prop::collection::vec(0.0f64..=1.0, ranks), 0..12)
    }

    fn aggregator(rows: &[Vec<f64>], ranks: u8) -> RankAggregator {
        let items = rows
            .iter()
            .enumerate()
            .map(|(i, fractions)| {
                Item::new(
                    format!("item-{}", i),
                    RankDistribution::from_fractions(fractions).unwrap(),
                )
            })
            .collect();
        RankAggregator::new(WeightTable::linear(ranks).unwrap(), items)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn ranked_scores_never_increase(rows in survey(5)) {
            let ranked = aggregator(&rows, 5).rank_items().unwrap();
            prop_assert_eq!(ranked.len(), rows.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }

        #[test]
        fn ranking_is_idempotent(rows in survey(4)) {
            let agg = aggregator(&rows, 4);
            prop_assert_eq!(agg.rank_items().unwrap(), agg.rank_items().unwrap());
        }

        #[test]
        fn score_is_dot_product(fractions in prop::collection::vec(0.0f64..=1.0, 6)) {
            let agg = aggregator(std::slice::from_ref(&fractions), 6);
            let expected: f64 = fractions
                .iter()
                .enumerate()
                .map(|(i, f)| f * (6 - i) as f64)
                .sum();
            let score = agg.compute_weighted_score("item-0").unwrap();
            prop_assert!((score - expected).abs() < 1e-9);
        }
    }
}
