//! File system watcher for watch mode

use crate::survey::SURVEY_SUFFIX;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a survey file or directory and emits changed survey paths
pub struct SurveyWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    patterns: Vec<String>,
    /// Set when watching a single file; its parent directory is watched
    target: Option<PathBuf>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl SurveyWatcher {
    /// Start watching the given path (file or directory) for default survey files
    pub fn watch(path: &Path) -> notify::Result<Self> {
        Self::watch_with_patterns(path, &[SURVEY_SUFFIX])
    }

    /// Start watching, accepting files that end with any of `patterns`
    pub fn watch_with_patterns(path: &Path, patterns: &[&str]) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let mut target = None;
        if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
        } else if let Some(parent) = path.parent() {
            target = Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            target,
        })
    }

    /// Check if the path names a survey file this watcher cares about
    pub fn is_survey_file(&self, p: &Path) -> bool {
        let patterns: Vec<&str> = self.patterns.iter().map(String::as_str).collect();
        crate::survey::is_survey_file(p, &patterns)
    }

    /// In single-file mode only the watched file counts, not its siblings
    fn is_watched(&self, p: &Path) -> bool {
        match self.target {
            None => self.is_survey_file(p),
            Some(ref target) => {
                p == target.as_path()
                    || fs::canonicalize(p)
                        .map(|canonical| canonical == *target)
                        .unwrap_or(false)
            }
        }
    }

    /// Collect survey paths from an event
    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| self.is_watched(p))
            .cloned()
            .collect()
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(e)) => {
                log::warn!("watch error: {}", e);
                return vec![];
            }
            Err(_) => return vec![],
        }

        // Debounce: collect further events for a short time
        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }
}
