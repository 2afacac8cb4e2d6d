//! Categorical tallies: answers with counts and reported percentages

use crate::{CategoryCount, CategoryShare};
use std::cmp::Ordering;

/// Orders categorical answers by reported percentage
#[derive(Debug, Clone)]
pub struct CategoryTally {
    categories: Vec<CategoryCount>,
}

impl CategoryTally {
    pub fn new(categories: Vec<CategoryCount>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryCount] {
        &self.categories
    }

    pub fn total_responses(&self) -> u32 {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// Sum of reported percentages (≈100 for well-formed data)
    pub fn percent_total(&self) -> u32 {
        self.categories.iter().map(|c| c.percent).sum()
    }

    /// Count of `label` as a percentage of all responses
    pub fn count_share(&self, label: &str) -> Option<f64> {
        let category = self.categories.iter().find(|c| c.label == label)?;
        Some(share(category.count, self.total_responses()))
    }

    /// Highest reported percentage first; ties by count, then label
    pub fn ranked(&self) -> Vec<CategoryShare> {
        let total = self.total_responses();
        let mut sorted: Vec<&CategoryCount> = self.categories.iter().collect();
        sorted.sort_by(|a, b| compare_categories(a, b));
        sorted
            .into_iter()
            .map(|c| CategoryShare {
                label: c.label.clone(),
                count: c.count,
                percent: c.percent,
                count_share: share(c.count, total),
            })
            .collect()
    }
}

fn compare_categories(a: &CategoryCount, b: &CategoryCount) -> Ordering {
    b.percent
        .cmp(&a.percent)
        .then_with(|| b.count.cmp(&a.count))
        .then_with(|| a.label.cmp(&b.label))
}

fn share(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) * 100.0 / f64::from(total)
    }
}
