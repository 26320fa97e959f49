//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bias Detector - find bias in datasets and classifier predictions
///
/// Reports the category distribution of sensitive attributes, classifier
/// performance per group, and mitigation recommendations.
///
/// Examples:
///   bias-detector --data data.json --sensitive gender,ras
///   bias-detector --data data.json --sensitive gender --target label --prediction-column pred
///   bias-detector --data data.json --config audit.toml --format json --output report.json
///   bias-detector --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file containing an array of records
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub data: Option<PathBuf>,

    /// Sensitive attribute columns (comma-separated)
    ///
    /// Example: --sensitive gender,ras
    #[arg(short, long, value_name = "COLUMNS", value_delimiter = ',')]
    pub sensitive: Option<Vec<String>>,

    /// Target (true label) column for model analysis
    #[arg(short, long, value_name = "COLUMN")]
    pub target: Option<String>,

    /// Column holding precomputed model predictions
    ///
    /// Overrides the [model] section of the config file.
    #[arg(long, value_name = "COLUMN")]
    pub prediction_column: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .biasdetector.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "BIAS_DETECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Include raw category counts in the dataset report
    #[arg(long)]
    pub detailed: bool,

    /// Minority/majority ratio below which a distribution is imbalanced
    #[arg(long, value_name = "RATIO")]
    pub imbalance_threshold: Option<f64>,

    /// Metric difference between groups above which a gap is reported
    #[arg(long, value_name = "GAP")]
    pub performance_gap_threshold: Option<f64>,

    /// Only analyze the dataset, even if a model is configured
    #[arg(long)]
    pub skip_model: bool,

    /// Exit with code 2 if any bias is detected
    ///
    /// Useful for CI pipelines.
    #[arg(long)]
    pub fail_on_bias: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .biasdetector.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.data {
            Some(ref path) if !path.is_file() => {
                return Err(format!("Data file does not exist: {}", path.display()));
            }
            None => return Err("--data is required".to_string()),
            _ => {}
        }

        if let Some(ratio) = self.imbalance_threshold {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err("Imbalance threshold must be in (0.0, 1.0]".to_string());
            }
        }

        if let Some(gap) = self.performance_gap_threshold {
            if !(0.0..=1.0).contains(&gap) {
                return Err("Performance gap threshold must be between 0.0 and 1.0".to_string());
            }
        }

        if let Some(ref sensitive) = self.sensitive {
            if sensitive.iter().any(|s| s.trim().is_empty()) {
                return Err("Sensitive attribute names must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.skip_model && self.prediction_column.is_some() {
            return Err("Cannot use both --skip-model and --prediction-column".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
