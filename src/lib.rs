//! Bias Detector - find bias in datasets and classifier predictions.
//!
//! Three components, usable on their own or chained:
//!
//! - [`DatasetAnalyzer`] computes the category distribution of each sensitive
//!   attribute.
//! - [`ModelAnalyzer`] evaluates a [`Classifier`] overall and per category.
//! - [`MitigationRecommender`] turns both results into recommendations.
//!
//! ```no_run
//! use bias_detector::{Dataset, DatasetAnalyzer, MitigationRecommender};
//!
//! # fn main() -> bias_detector::Result<()> {
//! let dataset = Dataset::load(std::path::Path::new("data.json"))?;
//! let mut analyzer = DatasetAnalyzer::new(&dataset, vec!["gender".to_string()])?;
//! println!("{}", analyzer.generate_report(true)?);
//!
//! let analysis = analyzer.analyze()?.clone();
//! for rec in MitigationRecommender::new(Some(&analysis), None).generate_recommendations(0.5, 0.1) {
//!     println!("{}", rec);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod mitigation;
pub mod models;
pub mod report;

pub use analysis::{DatasetAnalyzer, ModelAnalyzer};
pub use classifier::{Classifier, ColumnClassifier, LinearClassifier};
pub use dataset::{Dataset, Value};
pub use error::{BiasError, PredictionError, Result};
pub use mitigation::{MitigationRecommender, Recommendation, Thresholds};
pub use models::{
    AttributeDistribution, AttributePerformance, AuditReport, CategoryShare, DatasetAnalysis,
    GroupPerformance, Metric, ModelAnalysis, PerformanceMetrics, ReportMetadata,
};
