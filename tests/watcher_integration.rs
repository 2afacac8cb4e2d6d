//! Integration tests for the watcher public API.
//! Exercises SurveyWatcher::is_survey_file and that watch() can be created for files and directories.

use std::path::Path;
use surveyrank::watcher::SurveyWatcher;

#[test]
fn watcher_accepts_survey_suffix() {
    let dir = tempfile::TempDir::new().unwrap();
    let watcher = SurveyWatcher::watch(dir.path()).unwrap();
    assert!(watcher.is_survey_file(Path::new("usage.survey.json")));
    assert!(watcher.is_survey_file(Path::new("2024/q3/usage.survey.json")));
}

#[test]
fn watcher_rejects_other_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let watcher = SurveyWatcher::watch(dir.path()).unwrap();
    assert!(!watcher.is_survey_file(Path::new("usage.json")));
    assert!(!watcher.is_survey_file(Path::new("survey.json.bak")));
    assert!(!watcher.is_survey_file(Path::new(".surveyrankrc.json")));
}

#[test]
fn watcher_watch_temp_dir_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = SurveyWatcher::watch(dir.path());
    assert!(
        result.is_ok(),
        "watch on temp dir should succeed: {:?}",
        result.err()
    );
}

#[test]
fn watcher_watch_single_file_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("challenges.survey.json");
    std::fs::copy("tests/fixtures/challenges.survey.json", &file).unwrap();
    assert!(SurveyWatcher::watch(&file).is_ok());
}
