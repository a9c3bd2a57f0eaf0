//! Configuration for the analyzer.
//!
//! Loaded from a TOML file; every field has a default so partial files work.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::checks::{CheckPreset, Metadata, ResultType};

/// Snapshot files written by the capture side: `accessibility0.meta`, `accessibility1.meta`, ...
pub const DEFAULT_SNAPSHOT_PATTERN: &str = r"^accessibility[0-9]+\.meta$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Check preset to evaluate
    #[serde(default)]
    pub preset: CheckPreset,

    /// Overrides the default minimum touch target size (48dp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_touch_target_size_dp: Option<u32>,

    /// Regex matched against file names when scanning a target directory
    #[serde(default = "default_snapshot_pattern")]
    pub snapshot_pattern: String,

    /// Result types kept in the report
    #[serde(default = "default_report_result_types")]
    pub report_result_types: Vec<ResultType>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            preset: CheckPreset::default(),
            min_touch_target_size_dp: None,
            snapshot_pattern: default_snapshot_pattern(),
            report_result_types: default_report_result_types(),
        }
    }
}

fn default_snapshot_pattern() -> String {
    DEFAULT_SNAPSHOT_PATTERN.to_string()
}

fn default_report_result_types() -> Vec<ResultType> {
    vec![ResultType::Error, ResultType::Warning]
}

impl AnalyzerConfig {
    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                warn!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(path, contents)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Options handed to every check.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            customized_touch_target_size_dp: self.min_touch_target_size_dp,
        }
    }

    pub fn reports(&self, result_type: ResultType) -> bool {
        self.report_result_types.contains(&result_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.preset, CheckPreset::Latest);
        assert_eq!(config.min_touch_target_size_dp, None);
        assert!(config.reports(ResultType::Error));
        assert!(config.reports(ResultType::Warning));
        assert!(!config.reports(ResultType::Info));
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
preset = "version_2_0"
min_touch_target_size_dp = 32
report_result_types = ["ERROR"]
"#;

        let config: AnalyzerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.preset, CheckPreset::Version2_0);
        assert_eq!(config.metadata().customized_touch_target_size_dp, Some(32));
        assert_eq!(config.report_result_types, vec![ResultType::Error]);
        assert_eq!(config.snapshot_pattern, DEFAULT_SNAPSHOT_PATTERN);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "preset = [not toml").unwrap();

        assert_eq!(AnalyzerConfig::load_from_path(&path), AnalyzerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("analyzer.toml");
        let config = AnalyzerConfig {
            preset: CheckPreset::Version1_0,
            min_touch_target_size_dp: Some(40),
            ..AnalyzerConfig::default()
        };

        config.save_to_path(&path).unwrap();
        assert_eq!(AnalyzerConfig::load_from_path(&path), config);
    }
}
