//! Data-quality checks for survey tables
//!
//! These checks report; they never correct data or change scores.

use crate::aggregator::WeightTable;
use crate::{CategoryCount, Check, Finding, Item, Severity};

/// Default allowed distance of a distribution's sum from 1.0
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.02;
/// Default allowed distance of reported percentages from 100
pub const DEFAULT_PERCENT_TOLERANCE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sum: f64,
    pub percent: u32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            sum: DEFAULT_SUM_TOLERANCE,
            percent: DEFAULT_PERCENT_TOLERANCE,
        }
    }
}

/// Runs the data-quality checks with a fixed set of tolerances
#[derive(Debug, Clone, Default)]
pub struct QualityChecker {
    tolerances: Tolerances,
}

impl QualityChecker {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    /// Check rank-distribution items against their weight table
    pub fn check_ranking(&self, items: &[Item], weights: &WeightTable) -> Vec<Finding> {
        let mut findings = Vec::new();

        if items.is_empty() {
            findings.push(empty_survey("Survey has no items to rank"));
            return findings;
        }

        for item in items {
            let total = item.distribution.total();
            if (total - 1.0).abs() > self.tolerances.sum {
                findings.push(Finding {
                    check: Check::DistributionSum,
                    severity: Severity::Warning,
                    message: format!(
                        "Rank fractions sum to {:.3}, expected 1.0 ± {}",
                        total, self.tolerances.sum
                    ),
                    item: Some(item.label.clone()),
                });
            }

            let unweighted: Vec<String> = item
                .distribution
                .ranks()
                .filter(|rank| !weights.covers(*rank))
                .map(|rank| rank.to_string())
                .collect();
            if !unweighted.is_empty() {
                findings.push(Finding {
                    check: Check::UnweightedRank,
                    severity: Severity::Info,
                    message: format!(
                        "Rank(s) {} carry no weight and are left out of the score",
                        unweighted.join(", ")
                    ),
                    item: Some(item.label.clone()),
                });
            }
        }

        findings
    }

    /// Check that reported percentages add up to ≈100
    pub fn check_categories(&self, categories: &[CategoryCount]) -> Vec<Finding> {
        if categories.is_empty() {
            return vec![empty_survey("Survey has no categories")];
        }

        let total: u32 = categories.iter().map(|c| c.percent).sum();
        if total.abs_diff(100) > self.tolerances.percent {
            return vec![Finding {
                check: Check::PercentSum,
                severity: Severity::Warning,
                message: format!(
                    "Reported percentages sum to {}%, expected 100% ± {}",
                    total, self.tolerances.percent
                ),
                item: None,
            }];
        }

        Vec::new()
    }
}

fn empty_survey(message: &str) -> Finding {
    Finding {
        check: Check::EmptySurvey,
        severity: Severity::Warning,
        message: message.to_string(),
        item: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RankDistribution;

    fn item(label: &str, fractions: &[f64]) -> Item {
        Item::new(label, RankDistribution::from_fractions(fractions).unwrap())
    }

    #[test]
    fn test_sum_within_tolerance() {
        let weights = WeightTable::linear(3).unwrap();
        let findings = QualityChecker::default()
            .check_ranking(&[item("a", &[0.34, 0.33, 0.34])], &weights);
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_sum_off_is_warning() {
        let weights = WeightTable::linear(2).unwrap();
        let findings =
            QualityChecker::default().check_ranking(&[item("a", &[0.5, 0.2])], &weights);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, Check::DistributionSum);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].item.as_deref(), Some("a"));
        assert!(findings[0].message.contains("0.700"));
    }

    #[test]
    fn test_custom_tolerance() {
        let weights = WeightTable::linear(2).unwrap();
        let checker = QualityChecker::new(Tolerances {
            sum: 0.5,
            percent: 3,
        });
        assert!(checker
            .check_ranking(&[item("a", &[0.5, 0.2])], &weights)
            .is_empty());
    }

    #[test]
    fn test_unweighted_rank_is_info() {
        let weights = WeightTable::linear(2).unwrap();
        let findings = QualityChecker::default()
            .check_ranking(&[item("a", &[0.5, 0.3, 0.2])], &weights);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, Check::UnweightedRank);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains('3'));
    }

    #[test]
    fn test_empty_ranking() {
        let weights = WeightTable::linear(2).unwrap();
        let findings = QualityChecker::default().check_ranking(&[], &weights);
        assert_eq!(findings[0].check, Check::EmptySurvey);
    }

    #[test]
    fn test_percent_sum() {
        let checker = QualityChecker::default();
        let near = vec![
            CategoryCount::new("a", 10, 50),
            CategoryCount::new("b", 10, 48),
        ];
        assert!(checker.check_categories(&near).is_empty());

        let off = vec![
            CategoryCount::new("a", 10, 50),
            CategoryCount::new("b", 10, 60),
        ];
        let findings = checker.check_categories(&off);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, Check::PercentSum);
        assert!(findings[0].message.contains("110%"));
    }

    #[test]
    fn test_empty_categories() {
        let findings = QualityChecker::default().check_categories(&[]);
        assert_eq!(findings[0].check, Check::EmptySurvey);
    }
}
