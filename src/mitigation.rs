//! Threshold-based mitigation recommendations.
//!
//! The recommender reads dataset and model analysis results and flags two
//! kinds of disparity: an imbalanced category distribution, and a performance
//! gap between the groups of an attribute. When several categories share the
//! lowest (or highest) value, the first one in the result's category order is
//! named. For distributions that order is most frequent first; for model
//! groups it is the order of first appearance in the dataset.

use crate::models::{DatasetAnalysis, Metric, ModelAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Thresholds that decide when a recommendation fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minority/majority proportion ratio below which a distribution counts as
    /// imbalanced.
    #[serde(default = "default_imbalance")]
    pub imbalance: f64,
    /// Best minus worst group metric above which a gap is reported.
    #[serde(default = "default_performance_gap")]
    pub performance_gap: f64,
}

fn default_imbalance() -> f64 {
    0.5
}

fn default_performance_gap() -> f64 {
    0.1
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            imbalance: default_imbalance(),
            performance_gap: default_performance_gap(),
        }
    }
}

/// A single recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Category distribution of an attribute is imbalanced.
    Imbalance {
        attribute: String,
        minority: String,
        majority: String,
        ratio: f64,
    },
    /// A metric differs too much between the groups of an attribute.
    PerformanceGap {
        attribute: String,
        metric: Metric,
        worst: String,
        best: String,
        gap: f64,
        threshold: f64,
    },
    /// No rule fired.
    NoSignificantBias,
}

impl Recommendation {
    /// Returns true unless this is [`Recommendation::NoSignificantBias`].
    pub fn is_bias(&self) -> bool {
        !matches!(self, Recommendation::NoSignificantBias)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Imbalance {
                attribute,
                minority,
                majority,
                ..
            } => write!(
                f,
                "Dataset: Atribut '{}' menunjukkan ketidakseimbangan yang signifikan. \
                 Pertimbangkan untuk menggunakan teknik penyeimbangan ulang seperti oversampling pada '{}' \
                 atau undersampling pada '{}'.",
                attribute, minority, majority
            ),
            Recommendation::PerformanceGap {
                attribute,
                metric,
                worst,
                best,
                threshold,
                ..
            } => write!(
                f,
                "Model: Terdapat kesenjangan kinerja {} yang signifikan (> {:.0}%) \
                 pada atribut '{}' (antara {} dan {}). \
                 Pertimbangkan teknik keadilan algoritmik (misalnya, re-weighting, post-processing).",
                metric,
                threshold * 100.0,
                attribute,
                worst,
                best
            ),
            Recommendation::NoSignificantBias => write!(
                f,
                "Tidak ada masalah bias yang signifikan yang terdeteksi berdasarkan ambang batas saat ini."
            ),
        }
    }
}

/// Derives recommendations from analysis results.
#[derive(Debug, Clone, Copy, Default)]
pub struct MitigationRecommender<'a> {
    dataset_analysis: Option<&'a DatasetAnalysis>,
    model_analysis: Option<&'a ModelAnalysis>,
}

impl<'a> MitigationRecommender<'a> {
    /// Either analysis may be absent.
    pub fn new(
        dataset_analysis: Option<&'a DatasetAnalysis>,
        model_analysis: Option<&'a ModelAnalysis>,
    ) -> Self {
        Self {
            dataset_analysis,
            model_analysis,
        }
    }

    /// Recommendation strings for the given thresholds.
    pub fn generate_recommendations(
        &self,
        imbalance_threshold: f64,
        performance_gap_threshold: f64,
    ) -> Vec<String> {
        let thresholds = Thresholds {
            imbalance: imbalance_threshold,
            performance_gap: performance_gap_threshold,
        };
        self.recommend(&thresholds)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Structured recommendations: dataset findings first, then model findings.
    pub fn recommend(&self, thresholds: &Thresholds) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if let Some(analysis) = self.dataset_analysis {
            recommendations.extend(imbalance_findings(analysis, thresholds.imbalance));
        }
        if let Some(analysis) = self.model_analysis {
            recommendations.extend(performance_gap_findings(
                analysis,
                thresholds.performance_gap,
            ));
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::NoSignificantBias);
        }

        debug!("Generated {} recommendation(s)", recommendations.len());
        recommendations
    }
}

/// Index of the first minimum and the first maximum.
fn extremes(values: &[f64]) -> Option<(usize, usize)> {
    let first = *values.first()?;
    let mut min = (0, first);
    let mut max = (0, first);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < min.1 {
            min = (i, v);
        }
        if v > max.1 {
            max = (i, v);
        }
    }
    Some((min.0, max.0))
}

fn imbalance_findings(analysis: &DatasetAnalysis, threshold: f64) -> Vec<Recommendation> {
    let mut findings = Vec::new();

    for dist in &analysis.attributes {
        if dist.categories.len() < 2 {
            continue;
        }

        let proportions: Vec<f64> = dist.categories.iter().map(|c| c.proportion).collect();
        let Some((lo, hi)) = extremes(&proportions) else {
            continue;
        };

        let ratio = proportions[lo] / proportions[hi];
        if ratio < threshold {
            findings.push(Recommendation::Imbalance {
                attribute: dist.attribute.clone(),
                minority: dist.categories[lo].category.clone(),
                majority: dist.categories[hi].category.clone(),
                ratio,
            });
        }
    }

    findings
}

fn performance_gap_findings(analysis: &ModelAnalysis, threshold: f64) -> Vec<Recommendation> {
    let mut findings = Vec::new();

    for attr in &analysis.attributes {
        if attr.groups.len() < 2 {
            continue;
        }

        for metric in Metric::ALL {
            let values: Vec<f64> = attr.groups.iter().map(|g| g.metrics.get(metric)).collect();
            let Some((lo, hi)) = extremes(&values) else {
                continue;
            };

            let gap = values[hi] - values[lo];
            if gap > threshold {
                findings.push(Recommendation::PerformanceGap {
                    attribute: attr.attribute.clone(),
                    metric,
                    worst: attr.groups[lo].category.clone(),
                    best: attr.groups[hi].category.clone(),
                    gap,
                    threshold,
                });
            }
        }
    }

    findings
}
