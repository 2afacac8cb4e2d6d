//! Built-in survey datasets
//!
//! Student survey results on online collaboration platforms: three
//! rank-distribution tables and three categorical tallies.

use crate::aggregator::WeightTable;
use crate::error::{Result, SurveyError};
use crate::survey::{CategoricalSurvey, RankingSurvey, Survey, SurveyKind};
use crate::{CategoryCount, Item, RankDistribution};

/// Catalogue listing entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogueEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub kind: SurveyKind,
}

pub const ENTRIES: &[CatalogueEntry] = &[
    CatalogueEntry {
        slug: "feature-preferences",
        title: "Overall Weighted Importance of Features",
        kind: SurveyKind::Ranking,
    },
    CatalogueEntry {
        slug: "desired-features",
        title: "Overall Priority of Desired Features",
        kind: SurveyKind::Ranking,
    },
    CatalogueEntry {
        slug: "platform-usage",
        title: "Overall Weighted Importance of Platform Uses",
        kind: SurveyKind::Ranking,
    },
    CatalogueEntry {
        slug: "platform-challenges",
        title: "Current Platform Challenges Faced by Students",
        kind: SurveyKind::Categorical,
    },
    CatalogueEntry {
        slug: "adoption-motivators",
        title: "What Would Motivate Students to Try a New Platform?",
        kind: SurveyKind::Categorical,
    },
    CatalogueEntry {
        slug: "workshop-interest",
        title: "Interest in Platform Demo/Workshop Attendance",
        kind: SurveyKind::Categorical,
    },
];

const FEATURE_PREFERENCES: &[(&str, [f64; 6])] = &[
    ("High-quality video/audio", [0.28, 0.34, 0.16, 0.09, 0.12, 0.02]),
    ("Interactive tools", [0.08, 0.19, 0.27, 0.17, 0.14, 0.15]),
    ("Scheduling/attendance tracking", [0.02, 0.12, 0.18, 0.23, 0.23, 0.23]),
    ("Data privacy/security", [0.14, 0.11, 0.14, 0.26, 0.21, 0.14]),
    ("Integration with tools", [0.20, 0.03, 0.22, 0.12, 0.18, 0.25]),
    ("Ease of use", [0.34, 0.23, 0.05, 0.16, 0.05, 0.16]),
];

const DESIRED_FEATURES: &[(&str, [f64; 6])] = &[
    ("Real-Time Document Collaboration", [0.21, 0.21, 0.21, 0.15, 0.15, 0.07]),
    ("Interactive Quizzes & Teaching Tools", [0.10, 0.08, 0.16, 0.23, 0.26, 0.16]),
    ("Meeting Scheduling & Attendance", [0.10, 0.16, 0.25, 0.16, 0.16, 0.16]),
    ("All-in-One Functionality", [0.36, 0.20, 0.05, 0.11, 0.13, 0.15]),
    ("Customizable Features", [0.13, 0.25, 0.26, 0.15, 0.10, 0.11]),
    ("Data Privacy & Security", [0.10, 0.10, 0.07, 0.20, 0.20, 0.34]),
];

const PLATFORM_USAGE: &[(&str, [f64; 5])] = &[
    ("Club Meetings/Syncs", [0.40, 0.42, 0.13, 0.03, 0.02]),
    ("Peer Tutoring/Office Hours", [0.22, 0.17, 0.29, 0.17, 0.14]),
    ("Social Purposes", [0.10, 0.08, 0.25, 0.29, 0.27]),
    ("Online Lectures", [0.19, 0.19, 0.22, 0.22, 0.17]),
    ("Academic Group Projects", [0.10, 0.16, 0.12, 0.24, 0.39]),
];

const PLATFORM_CHALLENGES: &[(&str, u32, u32)] = &[
    ("Technical issues", 42, 43),
    ("Lack of specific tools", 16, 16),
    ("Scheduling difficulties", 14, 14),
    ("Limited UI/navigation", 18, 19),
    ("Privacy concerns", 7, 7),
];

const ADOPTION_MOTIVATORS: &[(&str, u32, u32)] = &[
    ("Better features compared to current platform", 37, 29),
    ("Recommendations from peers", 36, 28),
    ("Integration with existing tools", 29, 23),
    ("Free trial period", 23, 18),
];

const WORKSHOP_INTEREST: &[(&str, u32, u32)] = &[
    ("Not interested in new tools", 21, 30),
    ("Maybe, with more information", 20, 29),
    ("Yes, if demo is short & engaging", 16, 23),
    ("Yes, with free trials & giveaways", 13, 19),
];

pub fn entry(slug: &str) -> Option<&'static CatalogueEntry> {
    ENTRIES.iter().find(|e| e.slug == slug)
}

/// Build the built-in survey named by `slug`
pub fn builtin(slug: &str) -> Result<Survey> {
    let entry = entry(slug).ok_or_else(|| SurveyError::UnknownSurvey(slug.to_string()))?;
    let survey = match entry.slug {
        "feature-preferences" => {
            ranking(entry, FEATURE_PREFERENCES, 6, "Weighted Score", 5.0)?
        }
        "desired-features" => ranking(entry, DESIRED_FEATURES, 6, "Priority Score", 10.0)?,
        "platform-usage" => ranking(entry, PLATFORM_USAGE, 5, "Weighted Score", 5.0)?,
        "platform-challenges" => categorical(entry, PLATFORM_CHALLENGES),
        "adoption-motivators" => categorical(entry, ADOPTION_MOTIVATORS),
        "workshop-interest" => categorical(entry, WORKSHOP_INTEREST),
        other => return Err(SurveyError::UnknownSurvey(other.to_string())),
    };
    Ok(survey)
}

/// Every built-in survey, in catalogue order
pub fn all() -> Result<Vec<Survey>> {
    ENTRIES.iter().map(|e| builtin(e.slug)).collect()
}

fn ranking<const N: usize>(
    entry: &CatalogueEntry,
    rows: &[(&str, [f64; N])],
    ranks: u8,
    score_label: &str,
    label_threshold: f64,
) -> Result<Survey> {
    let items = rows
        .iter()
        .map(|(label, fractions)| -> Result<Item> {
            Ok(Item::new(*label, RankDistribution::from_fractions(fractions)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Survey::Ranking(RankingSurvey {
        name: entry.slug.to_string(),
        title: entry.title.to_string(),
        score_label: score_label.to_string(),
        label_threshold,
        weights: WeightTable::linear(ranks)?,
        items,
    }))
}

fn categorical(entry: &CatalogueEntry, rows: &[(&str, u32, u32)]) -> Survey {
    Survey::Categorical(CategoricalSurvey {
        name: entry.slug.to_string(),
        title: entry.title.to_string(),
        categories: rows
            .iter()
            .map(|(label, count, percent)| CategoryCount::new(*label, *count, *percent))
            .collect(),
    })
}
