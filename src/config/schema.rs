//! Config schema and deserialization

use crate::quality::Tolerances;
use crate::survey::SURVEY_SUFFIX;
use serde::Deserialize;
use std::path::Path;

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    #[serde(default)]
    pub sum_tolerance: Option<f64>,

    #[serde(default)]
    pub percent_tolerance: Option<u32>,

    #[serde(default)]
    pub strict: Option<bool>,
}

/// Root config structure for .surveyrankrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Allowed distance of a rank distribution's sum from 1.0. Default: 0.02
    #[serde(default)]
    pub sum_tolerance: Option<f64>,

    /// Allowed distance of reported percentages from 100. Default: 3
    #[serde(default)]
    pub percent_tolerance: Option<u32>,

    /// Exit 1 when any data-quality warning is found
    #[serde(default)]
    pub strict: Option<bool>,

    /// Glob patterns for files/directories to skip when scanning
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Survey file suffixes (default: .survey.json)
    #[serde(default)]
    pub survey_patterns: Vec<String>,

    /// Per-path overrides, applied in order
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_strict: bool) -> Self {
        if cli_strict {
            self.strict = Some(true);
        }
        self
    }

    pub fn tolerances(&self) -> Tolerances {
        let defaults = Tolerances::default();
        Tolerances {
            sum: self.sum_tolerance.unwrap_or(defaults.sum),
            percent: self.percent_tolerance.unwrap_or(defaults.percent),
        }
    }

    /// Get effective config for a specific survey file, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            tolerances: self.tolerances(),
            strict: self.strict.unwrap_or(false),
        };

        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(sum) = override_cfg.sum_tolerance {
                    effective.tolerances.sum = sum;
                }
                if let Some(percent) = override_cfg.percent_tolerance {
                    effective.tolerances.percent = percent;
                }
                if let Some(strict) = override_cfg.strict {
                    effective.strict = strict;
                }
            }
        }

        effective
    }

    /// Effective config for surveys that have no file (built-ins)
    pub fn effective_default(&self) -> EffectiveConfig {
        EffectiveConfig {
            tolerances: self.tolerances(),
            strict: self.strict.unwrap_or(false),
        }
    }

    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher().is_match(file_path),
            Err(e) => {
                log::warn!("ignoring invalid override pattern {}: {}", pattern, e);
                false
            }
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.sum_tolerance.is_none() {
            self.sum_tolerance = base.sum_tolerance;
        }
        if self.percent_tolerance.is_none() {
            self.percent_tolerance = base.percent_tolerance;
        }
        if self.strict.is_none() {
            self.strict = base.strict;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.survey_patterns.is_empty() {
            self.survey_patterns = base.survey_patterns;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    pub fn get_survey_patterns(&self) -> Vec<&str> {
        if self.survey_patterns.is_empty() {
            vec![SURVEY_SUFFIX]
        } else {
            self.survey_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

/// Effective configuration for one survey (after applying overrides)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveConfig {
    pub tolerances: Tolerances,
    pub strict: bool,
}
