//! JSON reporter for machine-readable output

use crate::analyzer::AggregateStats;
use crate::SurveyReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single survey as JSON
    pub fn report(&self, report: &SurveyReport) -> String {
        self.to_json(report)
    }

    /// Report several surveys with summary
    pub fn report_with_summary(&self, reports: &[SurveyReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports,
            summary: JsonSummary {
                surveys_analyzed: stats.surveys_analyzed,
                total_entries: stats.total_entries,
                total_warnings: stats.total_warnings,
                total_findings: stats.total_findings,
            },
        };
        self.to_json(&output)
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.unwrap_or_else(|e| {
            log::error!("failed to serialize report: {}", e);
            "{}".to_string()
        })
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [SurveyReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    surveys_analyzed: usize,
    total_entries: usize,
    total_warnings: usize,
    total_findings: usize,
}
