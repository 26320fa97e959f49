//! Classification metrics.
//!
//! Labels are compared by their category key. Precision and recall are
//! averaged over classes weighted by true-class support, and a class with no
//! predicted (or no true) members contributes zero instead of failing.
//!
//! Rows whose true label is missing (null or NaN) are left out of every
//! metric. A missing prediction is kept but matches no class, so it only
//! lowers accuracy and recall.

use crate::dataset::Value;
use crate::models::PerformanceMetrics;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct ClassTally {
    support: usize,
    predicted: usize,
    true_positive: usize,
}

/// (true, predicted) category keys for rows with a known true label.
fn labelled<'a>(
    y_true: &'a [Value],
    y_pred: &'a [Value],
) -> impl Iterator<Item = (String, Option<String>)> + 'a {
    y_true
        .iter()
        .zip(y_pred)
        .filter_map(|(t, p)| Some((t.category()?, p.category())))
}

fn tally(y_true: &[Value], y_pred: &[Value]) -> (BTreeMap<String, ClassTally>, usize) {
    let mut classes: BTreeMap<String, ClassTally> = BTreeMap::new();
    let mut rows = 0;

    for (t, p) in labelled(y_true, y_pred) {
        rows += 1;
        if let Some(p) = p {
            if p == t {
                classes.entry(t.clone()).or_default().true_positive += 1;
            }
            classes.entry(p).or_default().predicted += 1;
        }
        classes.entry(t).or_default().support += 1;
    }

    (classes, rows)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Fraction of predictions equal to the true label.
pub fn accuracy(y_true: &[Value], y_pred: &[Value]) -> f64 {
    let (mut correct, mut rows) = (0, 0);
    for (t, p) in labelled(y_true, y_pred) {
        rows += 1;
        if p.as_deref() == Some(t.as_str()) {
            correct += 1;
        }
    }
    ratio(correct, rows)
}

/// Support-weighted precision.
pub fn weighted_precision(y_true: &[Value], y_pred: &[Value]) -> f64 {
    let (classes, n) = tally(y_true, y_pred);
    classes
        .values()
        .map(|c| ratio(c.support, n) * ratio(c.true_positive, c.predicted))
        .sum()
}

/// Support-weighted recall.
pub fn weighted_recall(y_true: &[Value], y_pred: &[Value]) -> f64 {
    let (classes, n) = tally(y_true, y_pred);
    classes
        .values()
        .map(|c| ratio(c.support, n) * ratio(c.true_positive, c.support))
        .sum()
}

/// Computes accuracy, weighted precision and weighted recall together.
pub fn evaluate(y_true: &[Value], y_pred: &[Value]) -> PerformanceMetrics {
    PerformanceMetrics {
        accuracy: accuracy(y_true, y_pred),
        precision: weighted_precision(y_true, y_pred),
        recall: weighted_recall(y_true, y_pred),
    }
}
