//! Classifier abstraction and built-in classifiers.
//!
//! [`ModelAnalyzer`](crate::analysis::ModelAnalyzer) only needs something that
//! can label rows of feature columns. Models trained elsewhere plug in by
//! implementing [`Classifier`]; the two built-ins cover the common CLI cases of
//! a pre-scored dataset and a linear scoring rule.

use crate::dataset::{Dataset, Value};
use crate::error::PredictionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trained model that assigns a class label to each row.
pub trait Classifier {
    /// Predict one label per row of `features`.
    fn predict(&self, features: &Dataset) -> Result<Vec<Value>, PredictionError>;

    /// Whether the model produces class labels rather than continuous scores.
    fn is_classifier(&self) -> bool {
        true
    }

    /// Human readable name for reports.
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, features: &Dataset) -> Result<Vec<Value>, PredictionError> {
        (**self).predict(features)
    }

    fn is_classifier(&self) -> bool {
        (**self).is_classifier()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reads predictions that were already computed into a dataset column.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    column: String,
}

impl ColumnClassifier {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Classifier for ColumnClassifier {
    fn predict(&self, features: &Dataset) -> Result<Vec<Value>, PredictionError> {
        let idx = features.column_index(&self.column).ok_or_else(|| {
            format!(
                "kolom prediksi '{}' tidak ada di antara fitur",
                self.column
            )
        })?;
        Ok(features.rows().iter().map(|row| row[idx].clone()).collect())
    }

    fn name(&self) -> &str {
        &self.column
    }
}

/// Linear scoring rule: `intercept + sum(weight * feature)`.
///
/// With a threshold the score is turned into one of two labels. Without one
/// the raw score is returned, which makes the model a regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Weight per feature column. Columns without a weight are ignored.
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default = "default_positive_label")]
    pub positive_label: Value,
    #[serde(default = "default_negative_label")]
    pub negative_label: Value,
}

fn default_positive_label() -> Value {
    Value::Int(1)
}

fn default_negative_label() -> Value {
    Value::Int(0)
}

impl LinearClassifier {
    /// Creates a thresholded linear classifier with 1/0 labels.
    pub fn new(weights: BTreeMap<String, f64>, intercept: f64, threshold: f64) -> Self {
        Self {
            weights,
            intercept,
            threshold: Some(threshold),
            positive_label: default_positive_label(),
            negative_label: default_negative_label(),
        }
    }

    fn score(&self, features: &Dataset, row: &[Value]) -> Result<f64, PredictionError> {
        let mut score = self.intercept;
        for (column, weight) in &self.weights {
            let idx = features
                .column_index(column)
                .ok_or_else(|| format!("fitur '{}' tidak ditemukan", column))?;
            let value = row[idx]
                .as_f64()
                .ok_or_else(|| format!("fitur '{}' bukan numerik: {}", column, row[idx]))?;
            score += weight * value;
        }
        Ok(score)
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &Dataset) -> Result<Vec<Value>, PredictionError> {
        features
            .rows()
            .iter()
            .map(|row| -> Result<Value, PredictionError> {
                let score = self.score(features, row)?;
                Ok(match self.threshold {
                    Some(t) if score >= t => self.positive_label.clone(),
                    Some(_) => self.negative_label.clone(),
                    None => Value::Float(score),
                })
            })
            .collect()
    }

    fn is_classifier(&self) -> bool {
        self.threshold.is_some()
    }

    fn name(&self) -> &str {
        "linear"
    }
}
