//! Classifier performance broken down by sensitive attribute.

use crate::analysis::metrics;
use crate::classifier::Classifier;
use crate::dataset::{Dataset, Value};
use crate::error::{BiasError, Result};
use crate::models::{AttributePerformance, GroupPerformance, ModelAnalysis, PerformanceMetrics};
use crate::report::format_model_report;
use tracing::{debug, info};

/// Evaluates a classifier overall and per category of each sensitive attribute.
pub struct ModelAnalyzer<'a, C: Classifier + ?Sized> {
    model: &'a C,
    dataset: &'a Dataset,
    target_variable: String,
    sensitive_attributes: Vec<String>,
    features: Vec<String>,
    results: Option<ModelAnalysis>,
}

impl<'a, C: Classifier + ?Sized> ModelAnalyzer<'a, C> {
    /// Validates the model and columns. Features are every column other than
    /// the target and the sensitive attributes.
    pub fn new(
        model: &'a C,
        dataset: &'a Dataset,
        target_variable: impl Into<String>,
        sensitive_attributes: Vec<String>,
    ) -> Result<Self> {
        let target_variable = target_variable.into();

        if !model.is_classifier() {
            return Err(BiasError::NotAClassifier(model.name().to_string()));
        }
        if !dataset.has_column(&target_variable) {
            return Err(BiasError::MissingTarget(target_variable));
        }

        let missing: Vec<String> = sensitive_attributes
            .iter()
            .filter(|a| !dataset.has_column(a))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BiasError::MissingAttributes(missing));
        }

        if dataset.is_empty() {
            return Err(BiasError::EmptyDataset);
        }

        let features = dataset
            .columns()
            .iter()
            .filter(|c| **c != target_variable && !sensitive_attributes.contains(c))
            .cloned()
            .collect();

        Ok(Self {
            model,
            dataset,
            target_variable,
            sensitive_attributes,
            features,
            results: None,
        })
    }

    pub fn model(&self) -> &C {
        self.model
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn target_variable(&self) -> &str {
        &self.target_variable
    }

    pub fn sensitive_attributes(&self) -> &[String] {
        &self.sensitive_attributes
    }

    /// Feature columns handed to the classifier.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Runs the classifier over the whole dataset and over every category of
    /// every sensitive attribute. Prediction errors are returned as-is.
    pub fn analyze(&mut self) -> Result<&ModelAnalysis> {
        info!(
            "Evaluating model '{}' on {} rows",
            self.model.name(),
            self.dataset.len()
        );

        let overall = self.evaluate(self.dataset)?;

        let mut attributes = Vec::with_capacity(self.sensitive_attributes.len());
        for attr in &self.sensitive_attributes {
            let mut groups = Vec::new();
            for category in self.dataset.categories(attr)? {
                let subset = self.dataset.filter_category(attr, &category)?;
                if subset.is_empty() {
                    continue;
                }

                let metrics = self.evaluate(&subset)?;
                debug!(
                    "{}='{}': {} rows, accuracy {:.4}",
                    attr,
                    category,
                    subset.len(),
                    metrics.accuracy
                );
                groups.push(GroupPerformance {
                    category,
                    rows: subset.len(),
                    metrics,
                });
            }
            attributes.push(AttributePerformance {
                attribute: attr.clone(),
                groups,
            });
        }

        Ok(&*self.results.insert(ModelAnalysis {
            overall,
            attributes,
        }))
    }

    /// Cached results of the last [`analyze`](Self::analyze) call.
    pub fn results(&self) -> Option<&ModelAnalysis> {
        self.results.as_ref()
    }

    /// Renders the report, analyzing first if nothing is cached.
    pub fn generate_report(&mut self) -> Result<String> {
        if let Some(results) = &self.results {
            return Ok(format_model_report(results));
        }
        let results = self.analyze()?;
        Ok(format_model_report(results))
    }

    fn evaluate(&self, rows: &Dataset) -> Result<PerformanceMetrics> {
        let features = rows.select(&self.features)?;
        let y_pred = self
            .model
            .predict(&features)
            .map_err(BiasError::Prediction)?;
        if y_pred.len() != rows.len() {
            return Err(BiasError::PredictionLength {
                expected: rows.len(),
                found: y_pred.len(),
            });
        }

        let y_true: Vec<Value> = rows.column(&self.target_variable)?.cloned().collect();
        Ok(metrics::evaluate(&y_true, &y_pred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ColumnClassifier, LinearClassifier};
    use crate::error::PredictionError;
    use std::cell::Cell;
    use std::collections::BTreeMap;

    /// 20 rows: gender is Pria for the first half, target alternates 1, 0.
    fn sample_data_for_model() -> Dataset {
        let fitur1: Vec<Value> = (0..20i64).map(Value::from).collect();
        let fitur2: Vec<Value> = (0..20i64).map(|i| Value::from(i % 4)).collect();
        let groups: Vec<Value> = (0..20)
            .map(|i| Value::from(if i < 10 { "Pria" } else { "Wanita" }))
            .collect();
        let target: Vec<Value> = (0..20i64).map(|i| Value::from((i + 1) % 2)).collect();

        Dataset::from_columns(vec![
            ("fitur1", fitur1),
            ("fitur2", fitur2),
            ("gender", groups),
            ("target", target),
        ])
        .unwrap()
    }

    fn linear_model() -> LinearClassifier {
        // positive when fitur2 >= 2
        let weights = BTreeMap::from([("fitur2".to_string(), 1.0)]);
        LinearClassifier::new(weights, -1.5, 0.0)
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _features: &Dataset) -> std::result::Result<Vec<Value>, PredictionError> {
            Err("model belum dilatih".into())
        }
    }

    struct CountingClassifier {
        calls: Cell<usize>,
    }

    impl Classifier for CountingClassifier {
        fn predict(&self, features: &Dataset) -> std::result::Result<Vec<Value>, PredictionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![Value::Int(1); features.len()])
        }
    }

    struct ShortClassifier;

    impl Classifier for ShortClassifier {
        fn predict(&self, _features: &Dataset) -> std::result::Result<Vec<Value>, PredictionError> {
            Ok(vec![Value::Int(1)])
        }
    }

    fn gender() -> Vec<String> {
        vec!["gender".to_string()]
    }

    #[test]
    fn test_new_keeps_inputs_and_infers_features() {
        let ds = sample_data_for_model();
        let model = linear_model();
        let analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();

        assert_eq!(analyzer.dataset(), &ds);
        assert_eq!(analyzer.target_variable(), "target");
        assert_eq!(analyzer.sensitive_attributes(), &["gender"]);
        assert_eq!(analyzer.features(), &["fitur1", "fitur2"]);
        assert_eq!(analyzer.model().name(), "linear");
    }

    #[test]
    fn test_new_rejects_regressor() {
        let ds = sample_data_for_model();
        let mut model = linear_model();
        model.threshold = None;
        assert!(matches!(
            ModelAnalyzer::new(&model, &ds, "target", gender()),
            Err(BiasError::NotAClassifier(_))
        ));
    }

    #[test]
    fn test_new_rejects_missing_target() {
        let ds = sample_data_for_model();
        let model = linear_model();
        let err = ModelAnalyzer::new(&model, &ds, "label", gender()).err().unwrap();
        assert!(matches!(err, BiasError::MissingTarget(ref t) if t == "label"));
    }

    #[test]
    fn test_new_rejects_missing_sensitive_attribute() {
        let ds = sample_data_for_model();
        let model = linear_model();
        assert!(matches!(
            ModelAnalyzer::new(&model, &ds, "target", vec!["ras".to_string()]),
            Err(BiasError::MissingAttributes(_))
        ));
    }

    #[test]
    fn test_new_rejects_empty_dataset() {
        let ds = Dataset::new(vec!["target".to_string()], Vec::new()).unwrap();
        let model = linear_model();
        assert!(matches!(
            ModelAnalyzer::new(&model, &ds, "target", Vec::new()),
            Err(BiasError::EmptyDataset)
        ));
    }

    #[test]
    fn test_analyze_structure() {
        let ds = sample_data_for_model();
        let model = linear_model();
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        let results = analyzer.analyze().unwrap();

        let by_gender = results.get("gender").unwrap();
        assert!(by_gender.group("Pria").is_some());
        assert!(by_gender.group("Wanita").is_some());
        assert_eq!(by_gender.groups[0].category, "Pria");
        assert_eq!(by_gender.groups[0].rows, 10);
    }

    #[test]
    fn test_uniform_model_matches_group_metrics() {
        // one wrong prediction in each half of the data
        let groups: Vec<Value> = (0..20)
            .map(|i| Value::from(if i < 10 { "Pria" } else { "Wanita" }))
            .collect();
        let target: Vec<Value> = (0..20i64).map(|i| Value::from((i + 1) % 2)).collect();
        let mut prediction = target.clone();
        prediction[0] = Value::Int(0);
        prediction[10] = Value::Int(0);
        let ds = Dataset::from_columns(vec![
            ("gender", groups),
            ("target", target),
            ("prediksi", prediction),
        ])
        .unwrap();

        let model = ColumnClassifier::new("prediksi");
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        let results = analyzer.analyze().unwrap();

        let pria = results.get("gender").unwrap().group("Pria").unwrap();
        let wanita = results.get("gender").unwrap().group("Wanita").unwrap();
        assert_eq!(pria, wanita);
        assert!((results.overall.accuracy - 0.9).abs() < 1e-12);
        assert!((results.overall.accuracy - (pria.accuracy + wanita.accuracy) / 2.0).abs() < 1e-12);
        assert!((results.overall.precision - (pria.precision + wanita.precision) / 2.0).abs() < 1e-12);
        assert!((results.overall.recall - (pria.recall + wanita.recall) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_null_categories_are_skipped() {
        let ds = Dataset::from_columns(vec![
            ("gender", vec!["Pria".into(), Value::Null, "Wanita".into()]),
            ("target", vec![Value::Int(1), Value::Int(0), Value::Int(1)]),
        ])
        .unwrap();
        let model = CountingClassifier {
            calls: Cell::new(0),
        };
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        let results = analyzer.analyze().unwrap();
        assert_eq!(results.get("gender").unwrap().groups.len(), 2);
        // overall plus one call per category
        assert_eq!(model.calls.get(), 3);
    }

    #[test]
    fn test_prediction_error_propagates() {
        let ds = sample_data_for_model();
        let model = FailingClassifier;
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        let err = analyzer.analyze().unwrap_err();
        assert!(matches!(err, BiasError::Prediction(_)));
        assert_eq!(err.to_string(), "model belum dilatih");
    }

    #[test]
    fn test_prediction_length_mismatch() {
        let ds = sample_data_for_model();
        let model = ShortClassifier;
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        assert!(matches!(
            analyzer.analyze(),
            Err(BiasError::PredictionLength {
                expected: 20,
                found: 1
            })
        ));
    }

    #[test]
    fn test_generate_report_uses_cache() {
        let ds = sample_data_for_model();
        let model = CountingClassifier {
            calls: Cell::new(0),
        };
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();

        let report = analyzer.generate_report().unwrap();
        assert!(report.contains("Laporan Analisis Bias Model"));
        assert!(report.contains("Kinerja Keseluruhan"));
        assert!(report.contains("Analisis Kinerja berdasarkan 'gender'"));
        assert!(report.contains("Kelompok 'Pria'"));
        assert!(report.contains("Kelompok 'Wanita'"));
        assert!(report.contains("Akurasi"));
        assert!(report.contains("Presisi"));
        assert!(report.contains("Recall"));
        assert_eq!(model.calls.get(), 3);

        analyzer.generate_report().unwrap();
        assert_eq!(model.calls.get(), 3);

        analyzer.analyze().unwrap();
        assert_eq!(model.calls.get(), 6);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let ds = sample_data_for_model();
        let model = linear_model();
        let mut analyzer = ModelAnalyzer::new(&model, &ds, "target", gender()).unwrap();
        let first = analyzer.analyze().unwrap().clone();
        let second = analyzer.analyze().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_boxed_dyn_classifier() {
        let ds = sample_data_for_model();
        let model: Box<dyn Classifier> = Box::new(linear_model());
        let mut analyzer = ModelAnalyzer::new(model.as_ref(), &ds, "target", gender()).unwrap();
        assert!(analyzer.analyze().is_ok());
    }
}
