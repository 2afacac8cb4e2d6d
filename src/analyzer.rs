//! Survey analysis: ranking plus data-quality findings

use crate::aggregator::RankAggregator;
use crate::error::Result;
use crate::quality::{QualityChecker, Tolerances};
use crate::survey::Survey;
use crate::tally::CategoryTally;
use crate::{ReportBody, Severity, SurveyReport};
use std::path::Path;

/// Turns a survey into a [`SurveyReport`]
#[derive(Debug, Clone, Default)]
pub struct SurveyAnalyzer {
    checker: QualityChecker,
}

/// Totals across several reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub surveys_analyzed: usize,
    /// Ranked items plus categories across all surveys
    pub total_entries: usize,
    pub total_warnings: usize,
    pub total_findings: usize,
}

impl SurveyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.checker = QualityChecker::new(tolerances);
        self
    }

    /// Rank the survey and run the data-quality checks.
    ///
    /// A ranking survey with an item that does not cover the weight table
    /// fails as a whole with `MissingRankData`.
    pub fn analyze(&self, survey: &Survey, source: Option<&Path>) -> Result<SurveyReport> {
        let (body, findings) = match survey {
            Survey::Ranking(s) => {
                let aggregator = RankAggregator::new(s.weights.clone(), s.items.clone());
                let ranked = aggregator.rank_items()?;
                let findings = self.checker.check_ranking(&s.items, &s.weights);
                let body = ReportBody::Ranking {
                    score_label: s.score_label.clone(),
                    label_threshold: s.label_threshold,
                    weights: s.weights.clone(),
                    ranked,
                };
                (body, findings)
            }
            Survey::Categorical(s) => {
                let tally = CategoryTally::new(s.categories.clone());
                let findings = self.checker.check_categories(&s.categories);
                let body = ReportBody::Categorical {
                    total_responses: tally.total_responses(),
                    ranked: tally.ranked(),
                };
                (body, findings)
            }
        };

        log::debug!(
            "analyzed {} survey '{}': {} findings",
            survey.kind(),
            survey.name(),
            findings.len()
        );

        Ok(SurveyReport {
            name: survey.name().to_string(),
            title: survey.title().to_string(),
            source: source.map(Path::to_path_buf),
            body,
            findings,
        })
    }

    pub fn aggregate_stats(reports: &[SurveyReport]) -> AggregateStats {
        let mut stats = AggregateStats {
            surveys_analyzed: reports.len(),
            ..AggregateStats::default()
        };
        for report in reports {
            stats.total_entries += match &report.body {
                ReportBody::Ranking { ranked, .. } => ranked.len(),
                ReportBody::Categorical { ranked, .. } => ranked.len(),
            };
            stats.total_findings += report.findings.len();
            stats.total_warnings += report
                .findings
                .iter()
                .filter(|f| f.severity == Severity::Warning)
                .count();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue;
    use crate::survey::RankingSurvey;
    use crate::{Item, RankDistribution, SurveyError, WeightTable};

    #[test]
    fn test_analyze_feature_preferences() {
        let survey = catalogue::builtin("feature-preferences").unwrap();
        let report = SurveyAnalyzer::new().analyze(&survey, None).unwrap();
        let ReportBody::Ranking { ranked, score_label, .. } = &report.body else {
            panic!("expected ranking body");
        };
        assert_eq!(score_label, "Weighted Score");
        assert_eq!(ranked.len(), 6);
        assert_eq!(ranked[0].label, "High-quality video/audio");
        let ease = ranked.iter().find(|r| r.label == "Ease of use").unwrap();
        assert!((ease.score - 4.13).abs() < 1e-9);
        assert!(report.findings.is_empty(), "{:?}", report.findings);
    }

    #[test]
    fn test_analyze_categorical() {
        let survey = catalogue::builtin("adoption-motivators").unwrap();
        let report = SurveyAnalyzer::new().analyze(&survey, None).unwrap();
        let ReportBody::Categorical { total_responses, ranked } = &report.body else {
            panic!("expected categorical body");
        };
        assert_eq!(*total_responses, 125);
        assert_eq!(ranked[0].label, "Better features compared to current platform");
        assert_eq!(report.source, None);
    }

    #[test]
    fn test_analyze_missing_rank_propagates() {
        let survey = Survey::Ranking(RankingSurvey {
            name: "broken".into(),
            title: "Broken".into(),
            score_label: "Score".into(),
            label_threshold: 5.0,
            weights: WeightTable::linear(2).unwrap(),
            items: vec![Item::new(
                "a",
                RankDistribution::from_fractions(&[1.0]).unwrap(),
            )],
        });
        let err = SurveyAnalyzer::new().analyze(&survey, None).unwrap_err();
        assert_eq!(
            err,
            SurveyError::MissingRankData {
                item: "a".into(),
                rank: 2
            }
        );
    }

    #[test]
    fn test_aggregate_stats() {
        let analyzer = SurveyAnalyzer::new();
        let reports: Vec<_> = catalogue::all()
            .unwrap()
            .iter()
            .map(|s| analyzer.analyze(s, Some(Path::new("builtin"))).unwrap())
            .collect();
        let stats = SurveyAnalyzer::aggregate_stats(&reports);
        assert_eq!(stats.surveys_analyzed, 6);
        assert_eq!(stats.total_entries, 6 + 6 + 5 + 5 + 4 + 4);
        assert_eq!(stats.total_warnings, 0);
    }
}
