//! Survey definitions and survey-file loading

mod schema;

pub use schema::{SurveyFile, SurveyKind};

use crate::aggregator::WeightTable;
use crate::error::SurveyError;
use crate::{CategoryCount, Item, Rank};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// File suffix recognized as a survey definition
pub const SURVEY_SUFFIX: &str = ".survey.json";

pub const DEFAULT_SCORE_LABEL: &str = "Weighted Score";
pub const DEFAULT_LABEL_THRESHOLD: f64 = 5.0;

/// A rank-distribution survey: items scored against one weight table
#[derive(Debug, Clone, PartialEq)]
pub struct RankingSurvey {
    pub name: String,
    pub title: String,
    pub score_label: String,
    pub label_threshold: f64,
    pub weights: WeightTable,
    pub items: Vec<Item>,
}

/// A categorical survey: counts and reported percentages per answer
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSurvey {
    pub name: String,
    pub title: String,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Survey {
    Ranking(RankingSurvey),
    Categorical(CategoricalSurvey),
}

impl Survey {
    pub fn name(&self) -> &str {
        match self {
            Survey::Ranking(s) => &s.name,
            Survey::Categorical(s) => &s.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Survey::Ranking(s) => &s.title,
            Survey::Categorical(s) => &s.title,
        }
    }

    pub fn kind(&self) -> SurveyKind {
        match self {
            Survey::Ranking(_) => SurveyKind::Ranking,
            Survey::Categorical(_) => SurveyKind::Categorical,
        }
    }
}

/// Load and validate a survey definition file
pub fn load_survey(path: &Path) -> Result<Survey> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read survey: {}", path.display()))?;
    parse_survey(&content, default_name(path))
        .with_context(|| format!("Invalid survey file: {}", path.display()))
}

/// Parse survey JSON; `fallback_name` is used when the file gives no name
pub fn parse_survey(content: &str, fallback_name: String) -> Result<Survey> {
    let file: SurveyFile = serde_json::from_str(content)?;
    let name = file.name.unwrap_or(fallback_name);
    let title = file.title.unwrap_or_else(|| name.clone());

    match file.kind {
        SurveyKind::Ranking => {
            if !file.categories.is_empty() {
                anyhow::bail!("ranking survey '{}' must not list categories", name);
            }
            ensure_unique_labels(file.items.iter().map(|item| item.label.as_str()))?;
            let weights = match file.weights {
                Some(weights) => weights,
                None => infer_weights(&file.items)?,
            };
            Ok(Survey::Ranking(RankingSurvey {
                name,
                title,
                score_label: file
                    .score_label
                    .unwrap_or_else(|| DEFAULT_SCORE_LABEL.to_string()),
                label_threshold: file.label_threshold.unwrap_or(DEFAULT_LABEL_THRESHOLD),
                weights,
                items: file.items,
            }))
        }
        SurveyKind::Categorical => {
            if !file.items.is_empty() || file.weights.is_some() {
                anyhow::bail!(
                    "categorical survey '{}' must not list items or weights",
                    name
                );
            }
            ensure_unique_labels(file.categories.iter().map(|c| c.label.as_str()))?;
            if file.score_label.is_some() || file.label_threshold.is_some() {
                log::warn!(
                    "scoreLabel/labelThreshold are ignored for categorical survey '{}'",
                    name
                );
            }
            Ok(Survey::Categorical(CategoricalSurvey {
                name,
                title,
                categories: file.categories,
            }))
        }
    }
}

/// Labels identify items, so a survey may not repeat one
fn ensure_unique_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label) {
            return Err(SurveyError::DuplicateItem(label.to_string()).into());
        }
    }
    Ok(())
}

/// Linear weights over the highest rank any item mentions
fn infer_weights(items: &[Item]) -> Result<WeightTable> {
    let max_rank = items
        .iter()
        .flat_map(|item| item.distribution.ranks())
        .max()
        .unwrap_or(Rank::FIRST);
    log::debug!("no weights given; using linear table over {} ranks", max_rank);
    Ok(WeightTable::linear(max_rank.get())?)
}

/// File name with the survey suffix (or extension) removed
fn default_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("survey");
    file_name
        .strip_suffix(SURVEY_SUFFIX)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name)
        .to_string()
}

/// Check whether a path names a survey file, given the accepted suffixes
pub fn is_survey_file(path: &Path, patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    patterns.iter().any(|p| name.ends_with(p))
}
