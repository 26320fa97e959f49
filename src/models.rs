//! Data models for analysis results.
//!
//! This module contains the structured results produced by the dataset and
//! model analyzers, and the combined report assembled by the binary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of one category within a sensitive attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Category key.
    pub category: String,
    /// Fraction of non-null rows with this category.
    pub proportion: f64,
    /// Number of rows with this category.
    pub count: usize,
}

/// Category distribution of one sensitive attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDistribution {
    /// Attribute (column) name.
    pub attribute: String,
    /// Number of non-null rows.
    pub total: usize,
    /// Categories, most frequent first.
    pub categories: Vec<CategoryShare>,
}

impl AttributeDistribution {
    /// Proportion of a category, if present.
    pub fn proportion(&self, category: &str) -> Option<f64> {
        self.find(category).map(|c| c.proportion)
    }

    /// Raw count of a category, if present.
    pub fn count(&self, category: &str) -> Option<usize> {
        self.find(category).map(|c| c.count)
    }

    fn find(&self, category: &str) -> Option<&CategoryShare> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Result of [`DatasetAnalyzer::analyze`](crate::analysis::DatasetAnalyzer::analyze).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnalysis {
    /// One entry per sensitive attribute, in the order they were requested.
    pub attributes: Vec<AttributeDistribution>,
}

impl DatasetAnalysis {
    /// Distribution of an attribute by name.
    pub fn get(&self, attribute: &str) -> Option<&AttributeDistribution> {
        self.attributes.iter().find(|a| a.attribute == attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Performance metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Metric; 3] = [Metric::Accuracy, Metric::Precision, Metric::Recall];

    /// Label shown in report lines.
    pub fn report_label(&self) -> &'static str {
        match self {
            Metric::Accuracy => "Akurasi",
            Metric::Precision => "Presisi",
            Metric::Recall => "Recall",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Accuracy => write!(f, "accuracy"),
            Metric::Precision => write!(f, "precision"),
            Metric::Recall => write!(f, "recall"),
        }
    }
}

/// Accuracy, weighted precision and weighted recall, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl PerformanceMetrics {
    /// Value of a single metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
        }
    }
}

/// Model performance on the rows of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    /// Category key.
    pub category: String,
    /// Number of rows in the group.
    pub rows: usize,
    /// Metrics computed on the group.
    pub metrics: PerformanceMetrics,
}

/// Per-category performance for one sensitive attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePerformance {
    /// Attribute (column) name.
    pub attribute: String,
    /// Groups in first-appearance order.
    pub groups: Vec<GroupPerformance>,
}

impl AttributePerformance {
    /// Metrics of a category, if present.
    pub fn group(&self, category: &str) -> Option<&PerformanceMetrics> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| &g.metrics)
    }
}

/// Result of [`ModelAnalyzer::analyze`](crate::analysis::ModelAnalyzer::analyze).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelAnalysis {
    /// Metrics over the whole dataset.
    pub overall: PerformanceMetrics,
    /// Per-attribute breakdowns, in the order they were requested.
    pub attributes: Vec<AttributePerformance>,
}

impl ModelAnalysis {
    /// Breakdown of an attribute by name.
    pub fn get(&self, attribute: &str) -> Option<&AttributePerformance> {
        self.attributes.iter().find(|a| a.attribute == attribute)
    }
}

/// Metadata about an audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed data file.
    pub data_path: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of rows in the dataset.
    pub rows: usize,
    /// Number of columns in the dataset.
    pub columns: usize,
    /// Sensitive attributes that were analyzed.
    pub sensitive_attributes: Vec<String>,
    /// Target column, when a model was analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Name of the classifier, when a model was analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete bias audit report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// Dataset distribution analysis.
    pub dataset: DatasetAnalysis,
    /// Model performance analysis, if a model was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelAnalysis>,
    /// Mitigation recommendations.
    pub recommendations: Vec<String>,
    /// Whether any recommendation points at a detected bias.
    pub bias_detected: bool,
}
