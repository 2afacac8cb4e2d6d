//! Console reporter with colored output

use crate::analyzer::AggregateStats;
use crate::{
    CategoryShare, Finding, Rank, RankedItem, ReportBody, Severity, SurveyReport, WeightTable,
};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single survey
    pub fn report(&self, report: &SurveyReport) {
        self.print_header(report);

        match &report.body {
            ReportBody::Ranking {
                score_label,
                label_threshold,
                weights,
                ranked,
            } => {
                self.print_scores(score_label, weights, ranked);
                self.print_rank_breakdown(ranked, *label_threshold);
            }
            ReportBody::Categorical {
                total_responses,
                ranked,
            } => {
                self.print_categories(*total_responses, ranked);
            }
        }

        if !report.findings.is_empty() {
            self.print_findings(&report.findings);
        }
        println!();
    }

    /// Report several surveys with a summary
    pub fn report_many(&self, reports: &[SurveyReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (top entry only)
    pub fn report_quiet(&self, report: &SurveyReport) {
        println!("{}", quiet_line(report));
    }

    fn print_header(&self, report: &SurveyReport) {
        println!();
        println!(
            "{}",
            format!("📊 {} [{}]", report.title, report.name).bold()
        );
        let entries = match &report.body {
            ReportBody::Ranking { ranked, .. } => ranked.len(),
            ReportBody::Categorical { ranked, .. } => ranked.len(),
        };
        println!(
            "   Kind: {} | Entries: {}",
            report.body.kind(),
            entries
        );
        if let Some(ref source) = report.source {
            println!("   Source: {}", source.display());
        }
        println!();
    }

    fn print_scores(&self, score_label: &str, weights: &WeightTable, ranked: &[RankedItem]) {
        println!("   {}", format!("{}s:", score_label).bold());
        if self.verbose {
            println!("   {}", format!("weights: {}", describe_weights(weights)).dimmed());
        }

        // Rank 1 weight bounds every score when fractions sum to 1
        let max_weight = weights
            .iter()
            .map(|(_, w)| w)
            .reduce(f64::max)
            .unwrap_or(1.0);

        for (position, item) in ranked.iter().enumerate() {
            let bar = self.create_score_bar(item.score, max_weight);
            println!(
                "   {:>2}. {} {:>5.2}  {}",
                position + 1,
                bar,
                item.score,
                item.label
            );
        }
        println!();
    }

    fn print_rank_breakdown(&self, ranked: &[RankedItem], label_threshold: f64) {
        println!("   {}", "Rank Breakdown:".bold());
        for item in ranked {
            println!("   {}", item.label.bold());
            for c in &item.contributions {
                let percent = c.fraction * 100.0;
                let line = breakdown_line(c.rank, c.fraction);
                if percent > label_threshold {
                    print!("     {}", line);
                } else {
                    print!("     {}", line.dimmed());
                }
                if self.verbose {
                    print!(
                        "  {}",
                        format!("× {} = {:.2}", c.weight, c.contribution).dimmed()
                    );
                }
                println!();
            }
            for (rank, fraction) in &item.unweighted {
                println!(
                    "     {}",
                    format!("{}  (unweighted)", breakdown_line(*rank, *fraction)).dimmed()
                );
            }
        }
        println!();
    }

    fn print_categories(&self, total_responses: u32, ranked: &[CategoryShare]) {
        println!("   Total Responses: {}", total_responses.to_string().bold());
        println!();
        println!("   {}", "Breakdown:".bold());
        for (position, category) in ranked.iter().enumerate() {
            let bar = self.create_score_bar(f64::from(category.percent), 100.0);
            println!(
                "   {:>2}. {} {:>3}% ({} responses)  {}",
                position + 1,
                bar,
                category.percent,
                category.count,
                category.label
            );
            if self.verbose {
                println!(
                    "       {} {}",
                    "↳".dimmed(),
                    format!("{:.1}% of counted responses", category.count_share).dimmed()
                );
            }
        }
        println!();
    }

    fn print_findings(&self, findings: &[Finding]) {
        println!("   {}", "Data Quality:".bold());

        let warnings = findings.iter().filter(|f| f.severity == Severity::Warning);
        let infos: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .collect();

        for finding in warnings {
            self.print_finding(finding);
        }

        // Info findings only in verbose mode or when there are few findings
        if self.verbose || findings.len() <= 5 {
            for finding in infos {
                self.print_finding(finding);
            }
        } else if !infos.is_empty() {
            println!(
                "   {} {} additional notes (use --verbose to show)",
                "ℹ".blue(),
                infos.len()
            );
        }
    }

    fn print_finding(&self, finding: &Finding) {
        let icon = match finding.severity {
            Severity::Warning => "⚠".yellow(),
            Severity::Info => "ℹ".blue(),
        };
        match finding.item {
            Some(ref item) => println!(
                "   {} [{}] {}: {}",
                icon,
                finding.check.to_string().dimmed(),
                item,
                finding.message
            ),
            None => println!(
                "   {} [{}] {}",
                icon,
                finding.check.to_string().dimmed(),
                finding.message
            ),
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Surveys analyzed: {}",
            stats.surveys_analyzed.to_string().bold()
        );
        println!("   Ranked entries:   {}", stats.total_entries);
        let warnings = stats.total_warnings.to_string();
        if stats.total_warnings > 0 {
            println!("   Warnings:         {}", warnings.yellow());
        } else {
            println!("   Warnings:         {}", warnings.green());
        }
        println!("   Findings:         {}", stats.total_findings);
        println!();
    }

    fn create_score_bar(&self, value: f64, max: f64) -> String {
        let filled = bar_cells(value, max, 20);
        let bar = format!("[{}{}]", "█".repeat(filled), "░".repeat(20 - filled));

        if self.use_colors {
            let ratio = if max > 0.0 { value / max } else { 0.0 };
            if ratio >= 0.6 {
                bar.green().to_string()
            } else if ratio >= 0.3 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// `name: top entry (value)`, or `name: (empty)`
fn quiet_line(report: &SurveyReport) -> String {
    let top = match &report.body {
        ReportBody::Ranking { ranked, .. } => ranked
            .first()
            .map(|item| format!("{} ({:.2})", item.label, item.score)),
        ReportBody::Categorical { ranked, .. } => ranked
            .first()
            .map(|category| format!("{} ({}%)", category.label, category.percent)),
    };
    format!(
        "{}: {}",
        report.name,
        top.unwrap_or_else(|| "(empty)".to_string())
    )
}

fn describe_weights(weights: &WeightTable) -> String {
    weights
        .iter()
        .map(|(rank, weight)| format!("{}→{}", rank, weight))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Number of filled cells out of `width` for `value` on a 0..=max scale
fn bar_cells(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    ((ratio * width as f64).round() as usize).min(width)
}

/// `[▓▓▓░░░░░░░] Rank 2:  28.0%`
fn breakdown_line(rank: Rank, fraction: f64) -> String {
    let percent = fraction * 100.0;
    format!("{} Rank {}: {:>5.1}%", create_mini_bar(percent), rank, percent)
}

fn create_mini_bar(percent: f64) -> String {
    let filled = bar_cells(percent, 100.0, 10);
    format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
}
