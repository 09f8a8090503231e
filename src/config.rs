//! Central configuration for an analysis run.
//!
//! Defaults cover the usual results layout. A TOML file passed with
//! `--config` overrides any subset of fields, and CLI flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use analytics::Tolerances;
use anyhow::Context;
use serde::Deserialize;

/// Master configuration for every command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Input Layout
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory holding one sub-directory per domain with its `specials.json`.
    pub domains_dir: PathBuf,
    /// Directory scanned for tournament directories.
    pub results_dir: PathBuf,
    /// Substring a directory name must contain to count as a tournament.
    pub tournament_marker: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Where campaign tables go (None = the results dir).
    pub output_dir: Option<PathBuf>,
    /// Write a per-seat move log next to each session's tables.
    pub write_move_logs: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────
    /// Evaluate sessions on one thread even when built with `parallel`.
    pub force_sequential: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Numeric Tolerances
    // ─────────────────────────────────────────────────────────────────────────
    /// Absolute band around zero for utility deltas.
    pub zero_tolerance: f64,
    /// Relative tolerance for frontier dominance checks.
    pub frontier_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let tolerances = Tolerances::default();
        Self {
            // Input Layout
            domains_dir: PathBuf::from("domains"),
            results_dir: PathBuf::from("results"),
            tournament_marker: "Tournament".to_string(),

            // Output
            output_dir: None,
            write_move_logs: true,

            // Execution
            force_sequential: false,

            // Numeric Tolerances
            zero_tolerance: tolerances.zero,
            frontier_tolerance: tolerances.frontier,
        }
    }
}

impl AnalysisConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn domains_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.domains_dir = dir.into();
        self
    }

    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn tournament_marker(mut self, marker: impl Into<String>) -> Self {
        self.tournament_marker = marker.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn write_move_logs(mut self, enabled: bool) -> Self {
        self.write_move_logs = enabled;
        self
    }

    pub fn force_sequential(mut self, sequential: bool) -> Self {
        self.force_sequential = sequential;
        self
    }

    pub fn zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = tolerance;
        self
    }

    pub fn frontier_tolerance(mut self, tolerance: f64) -> Self {
        self.frontier_tolerance = tolerance;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Computed Properties
    // ─────────────────────────────────────────────────────────────────────────

    /// Tolerances handed to the session computation.
    pub fn tolerances(&self) -> Tolerances {
        Tolerances::default()
            .zero(self.zero_tolerance)
            .frontier(self.frontier_tolerance)
    }

    /// Directory campaign tables are written to.
    pub fn campaign_output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.results_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.domains_dir, PathBuf::from("domains"));
        assert_eq!(config.tournament_marker, "Tournament");
        assert!(config.write_move_logs);
        assert!(!config.force_sequential);
        assert_eq!(config.tolerances(), Tolerances::default());
        assert_eq!(config.campaign_output_dir(), Path::new("results"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            results_dir = "runs/2024"
            force_sequential = true
            zero_tolerance = 1e-6
            "#,
        )
        .unwrap();

        assert_eq!(config.results_dir, PathBuf::from("runs/2024"));
        assert!(config.force_sequential);
        assert_eq!(config.tolerances().zero, 1e-6);
        assert_eq!(config.tolerances().frontier, 1e-9);
        assert_eq!(config.domains_dir, PathBuf::from("domains"));
        assert_eq!(config.campaign_output_dir(), Path::new("runs/2024"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(AnalysisConfig::from_toml_str("write_move_logs = \"yes\"").is_err());
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::new()
            .results_dir("r")
            .output_dir("out")
            .write_move_logs(false)
            .frontier_tolerance(1e-3);
        assert_eq!(config.campaign_output_dir(), Path::new("out"));
        assert!(!config.write_move_logs);
        assert_eq!(config.tolerances().frontier, 1e-3);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = AnalysisConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
