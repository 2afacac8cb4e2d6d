//! Configuration loading for surveyrank

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".surveyrankrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference relative to the including config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = config_dir.join(extends);

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .surveyrankrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{DEFAULT_PERCENT_TOLERANCE, DEFAULT_SUM_TOLERANCE};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        let tolerances = config.tolerances();
        assert_eq!(tolerances.sum, DEFAULT_SUM_TOLERANCE);
        assert_eq!(tolerances.percent, DEFAULT_PERCENT_TOLERANCE);
        assert_eq!(config.get_survey_patterns(), vec![".survey.json"]);
    }

    #[test]
    fn test_custom_path_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_found_in_parent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"sumTolerance": 0.1}"#).unwrap();
        let nested = dir.path().join("data").join("2024");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.sum_tolerance, Some(0.1));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn test_is_ignored_drafts() {
        let set = build_ignore_set(&["**/drafts/**".to_string()]).unwrap();
        assert!(is_ignored(Path::new("surveys/drafts/a.survey.json"), &set));
        assert!(!is_ignored(Path::new("surveys/a.survey.json"), &set));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(build_ignore_set(&["a/[".to_string()]).is_err());
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        let base_path = dir.path().join("base.json");
        let mut base_file = fs::File::create(&base_path).unwrap();
        writeln!(
            base_file,
            r#"{{
                "sumTolerance": 0.05,
                "percentTolerance": 5,
                "ignore": ["**/drafts/**"]
            }}"#
        )
        .unwrap();

        let child_path = dir.path().join(CONFIG_FILENAME);
        let mut child_file = fs::File::create(&child_path).unwrap();
        writeln!(
            child_file,
            r#"{{
                "extends": "./base",
                "sumTolerance": 0.01,
                "strict": true
            }}"#
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();

        // Child value wins
        assert_eq!(config.sum_tolerance, Some(0.01));
        // Base value is inherited
        assert_eq!(config.percent_tolerance, Some(5));
        assert!(config.ignore.contains(&"**/drafts/**".to_string()));
        assert_eq!(config.strict, Some(true));
        assert!(config.extends.is_none());
    }

    #[test]
    fn test_extends_chain() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.json"), r#"{"percentTolerance": 7}"#).unwrap();
        fs::write(
            dir.path().join("team.json"),
            r#"{"extends": "./base.json", "strict": true}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"extends": "./team.json", "sumTolerance": 0.04}"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.sum_tolerance, Some(0.04));
        assert_eq!(config.strict, Some(true));
        assert_eq!(config.percent_tolerance, Some(7));
        assert!(config.extends.is_none());
    }

    #[test]
    fn test_circular_extends() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"extends": "./b.json"}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"extends": "./a.json"}"#).unwrap();

        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = serde_json::from_str(
            r#"{
                "sumTolerance": 0.02,
                "overrides": [
                    {
                        "files": ["**/legacy/**"],
                        "sumTolerance": 0.1,
                        "strict": false
                    },
                    {
                        "files": ["**/*.final.survey.json"],
                        "strict": true
                    }
                ]
            }"#,
        )
        .unwrap();

        let effective = config.effective_for_file(Path::new("data/usage.survey.json"));
        assert_eq!(effective.tolerances.sum, 0.02);
        assert!(!effective.strict);

        let effective = config.effective_for_file(Path::new("data/legacy/usage.survey.json"));
        assert_eq!(effective.tolerances.sum, 0.1);

        let effective = config.effective_for_file(Path::new("data/usage.final.survey.json"));
        assert!(effective.strict);
    }

    #[test]
    fn test_merge_with_cli_strict() {
        let config = Config::default().merge_with_cli(true);
        assert!(config.effective_default().strict);
        let config = Config {
            strict: Some(true),
            ..Config::default()
        }
        .merge_with_cli(false);
        assert!(config.effective_default().strict);
    }
}
