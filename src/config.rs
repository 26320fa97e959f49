//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.biasdetector.toml` files.

use crate::cli::{Args, OutputFormat};
use anyhow::{Context, Result};
use bias_detector::classifier::{Classifier, ColumnClassifier, LinearClassifier};
use bias_detector::mitigation::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".biasdetector.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which columns to analyze.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Recommendation thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Classifier to evaluate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfig>,
}

/// Column selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sensitive attribute columns.
    #[serde(default)]
    pub sensitive_attributes: Vec<String>,

    /// Target (true label) column for model analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include raw category counts.
    #[serde(default)]
    pub detailed: bool,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Classifier description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelConfig {
    /// Predictions already stored in a dataset column.
    Column { column: String },
    /// Linear scoring rule.
    Linear(LinearClassifier),
}

impl ModelConfig {
    /// Instantiate the described classifier.
    pub fn build(&self) -> Box<dyn Classifier> {
        match self {
            ModelConfig::Column { column } => Box::new(ColumnClassifier::new(column.clone())),
            ModelConfig::Linear(model) => Box::new(model.clone()),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings and only
    /// override them when explicitly given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref sensitive) = args.sensitive {
            self.analysis.sensitive_attributes = sensitive.clone();
        }
        if let Some(ref target) = args.target {
            self.analysis.target = Some(target.clone());
        }

        if let Some(ref column) = args.prediction_column {
            self.model = Some(ModelConfig::Column {
                column: column.clone(),
            });
        }
        if args.skip_model {
            self.model = None;
        }

        if let Some(imbalance) = args.imbalance_threshold {
            self.thresholds.imbalance = imbalance;
        }
        if let Some(gap) = args.performance_gap_threshold {
            self.thresholds.performance_gap = gap;
        }

        if args.detailed {
            self.report.detailed = true;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use bias_detector::Value;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analysis.sensitive_attributes.is_empty());
        assert_eq!(config.thresholds.imbalance, 0.5);
        assert_eq!(config.thresholds.performance_gap, 0.1);
        assert_eq!(config.report.format, OutputFormat::Text);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[analysis]
sensitive_attributes = ["gender", "ras"]
target = "target"

[thresholds]
imbalance = 0.8

[report]
detailed = true
format = "json"

[model]
kind = "linear"
intercept = -1.5
threshold = 0.0
positive_label = "ya"
negative_label = "tidak"

[model.weights]
fitur2 = 1.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.analysis.sensitive_attributes, vec!["gender", "ras"]);
        assert_eq!(config.analysis.target.as_deref(), Some("target"));
        assert_eq!(config.thresholds.imbalance, 0.8);
        assert_eq!(config.thresholds.performance_gap, 0.1);
        assert!(config.report.detailed);
        assert_eq!(config.report.format, OutputFormat::Json);

        match &config.model {
            Some(ModelConfig::Linear(model)) => {
                assert_eq!(model.weights.get("fitur2"), Some(&1.0));
                assert_eq!(model.threshold, Some(0.0));
                assert_eq!(model.positive_label, Value::from("ya"));
            }
            other => panic!("unexpected model config: {:?}", other),
        }
        assert!(config.model.as_ref().map(|m| m.build().is_classifier()).unwrap_or(false));
    }

    #[test]
    fn test_parse_column_model() {
        let config: Config = toml::from_str("[model]\nkind = \"column\"\ncolumn = \"prediksi\"\n").unwrap();
        let model = config.model.unwrap().build();
        assert_eq!(model.name(), "prediksi");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nsensitive_attributes = [\"gender\"]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.analysis.sensitive_attributes, vec!["gender"]);
        assert!(Config::load(Path::new("tidak-ada.toml")).is_err());
    }

    #[test]
    fn test_merge_with_args_overrides_only_given_values() {
        let mut config = Config {
            analysis: AnalysisConfig {
                sensitive_attributes: vec!["ras".to_string()],
                target: Some("target".to_string()),
            },
            ..Config::default()
        };

        let mut args = make_args();
        args.prediction_column = Some("prediksi".to_string());
        args.performance_gap_threshold = Some(0.2);
        args.detailed = true;
        config.merge_with_args(&args);

        assert_eq!(config.analysis.sensitive_attributes, vec!["ras"]);
        assert_eq!(config.analysis.target.as_deref(), Some("target"));
        assert_eq!(config.thresholds.imbalance, 0.5);
        assert_eq!(config.thresholds.performance_gap, 0.2);
        assert!(config.report.detailed);
        assert!(matches!(config.model, Some(ModelConfig::Column { ref column }) if column == "prediksi"));

        args.skip_model = true;
        config.merge_with_args(&args);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[thresholds]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.thresholds, Thresholds::default());
    }
}
