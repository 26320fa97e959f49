//! Analysis modules.
//!
//! Dataset distributions, classifier performance per group, and the metrics
//! both are built on.

pub mod dataset;
pub mod metrics;
pub mod model;

pub use dataset::DatasetAnalyzer;
pub use model::ModelAnalyzer;
