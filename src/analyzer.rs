//! Batch analysis of captured snapshots.
//!
//! The analyzer scans a target directory for snapshot files, assembles each
//! into a `Hierarchy`, runs the configured preset over it and keeps the result
//! types the configuration asks for. Checks run in parallel: a frozen
//! hierarchy is only ever read, and every check is a stateless singleton.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checks::{checks_for_preset, CheckPreset, CheckResult};
use crate::config::AnalyzerConfig;
use crate::hierarchy::{Hierarchy, LoadError};
use crate::types::HierarchyError;
use crate::wire::CheckResultMessage;

/// Errors raised while analyzing a target directory.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid snapshot {}: {source}", .path.display())]
    Snapshot { path: PathBuf, source: LoadError },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AnalyzerError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Kept results for a single snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub file: String,
    pub results: Vec<CheckResultMessage>,
}

/// Results for every snapshot found in a target directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub target: String,
    pub preset: CheckPreset,
    pub snapshots: Vec<SnapshotReport>,
}

impl AnalysisReport {
    pub fn result_count(&self) -> usize {
        self.snapshots.iter().map(|snapshot| snapshot.results.len()).sum()
    }
}

pub struct Analyzer {
    config: AnalyzerConfig,
    pattern: Regex,
}

impl Analyzer {
    /// # Errors
    ///
    /// `AnalyzerError::Config` if the snapshot pattern is not a valid regex.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let pattern = Regex::new(&config.snapshot_pattern).map_err(|e| {
            AnalyzerError::Config(format!(
                "snapshot_pattern {:?} is not a valid regex: {}",
                config.snapshot_pattern, e
            ))
        })?;
        Ok(Analyzer { config, pattern })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Snapshot files directly inside `dir`, ordered by their capture number.
    pub fn discover_snapshots(&self, dir: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
        let entries = std::fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
            let path = entry.path();
            let matches = path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| self.pattern.is_match(name));
            if matches {
                snapshots.push(path);
            }
        }

        snapshots.sort_by_key(|path| {
            let name = file_name(path);
            (capture_number(&name), name)
        });
        debug!("Found {} snapshots in {:?}", snapshots.len(), dir);
        Ok(snapshots)
    }

    pub fn load_snapshot(path: &Path) -> Result<Hierarchy, AnalyzerError> {
        let file = File::open(path).map_err(|e| AnalyzerError::io(path, e))?;
        Hierarchy::from_reader(BufReader::new(file)).map_err(|source| AnalyzerError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Runs every check of the configured preset over the whole hierarchy.
    ///
    /// Results are ordered by check kind, then by the order each check emits them.
    pub fn evaluate(&self, hierarchy: &Hierarchy) -> Result<Vec<CheckResult>, AnalyzerError> {
        let checks: Vec<_> = checks_for_preset(self.config.preset)?.checks().collect();
        let metadata = self.config.metadata();

        let results: Vec<CheckResult> = checks
            .par_iter()
            .flat_map_iter(|check| check.run_check_on_hierarchy(hierarchy, None, &metadata))
            .collect();
        debug!("{} checks produced {} results", checks.len(), results.len());
        Ok(results)
    }

    pub fn analyze_snapshot(&self, path: &Path) -> Result<SnapshotReport, AnalyzerError> {
        let hierarchy = Self::load_snapshot(path)?;
        let results = self
            .evaluate(&hierarchy)?
            .iter()
            .filter(|result| self.config.reports(result.result_type))
            .map(CheckResult::to_message)
            .collect();

        Ok(SnapshotReport {
            file: file_name(path),
            results,
        })
    }

    pub fn analyze_dir(&self, dir: &Path) -> Result<AnalysisReport, AnalyzerError> {
        let snapshots = self.discover_snapshots(dir)?;
        if snapshots.is_empty() {
            warn!("No snapshot files matching {:?} in {:?}", self.config.snapshot_pattern, dir);
        }

        let reports = snapshots
            .iter()
            .map(|path| self.analyze_snapshot(path))
            .collect::<Result<Vec<_>, _>>()?;

        let report = AnalysisReport {
            target: dir.display().to_string(),
            preset: self.config.preset,
            snapshots: reports,
        };
        info!(
            "Analyzed {} snapshots with preset {}: {} results",
            report.snapshots.len(),
            report.preset,
            report.result_count()
        );
        Ok(report)
    }

    /// Writes each result of `report` next to its snapshot as
    /// `<snapshot stem>_check_result<index>.meta`.
    pub fn write_result_files(
        &self,
        dir: &Path,
        report: &SnapshotReport,
    ) -> Result<Vec<PathBuf>, AnalyzerError> {
        let stem = report
            .file
            .strip_suffix(".meta")
            .unwrap_or(report.file.as_str());

        let mut written = Vec::with_capacity(report.results.len());
        for (index, result) in report.results.iter().enumerate() {
            let path = dir.join(format!("{}_check_result{}.meta", stem, index));
            let json = serde_json::to_string_pretty(result)?;
            std::fs::write(&path, json).map_err(|e| AnalyzerError::io(&path, e))?;
            written.push(path);
        }
        debug!("Wrote {} result files for {}", written.len(), report.file);
        Ok(written)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Digits in a snapshot file name, so `accessibility10` sorts after `accessibility2`.
fn capture_number(name: &str) -> u64 {
    let digits: String = name.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(u64::MAX)
}
