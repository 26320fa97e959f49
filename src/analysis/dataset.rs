//! Distribution analysis of sensitive attributes.

use crate::dataset::Dataset;
use crate::error::{BiasError, Result};
use crate::models::{AttributeDistribution, CategoryShare, DatasetAnalysis};
use crate::report::format_dataset_report;
use std::collections::HashMap;
use tracing::debug;

/// Computes per-attribute category distributions over a dataset.
#[derive(Debug)]
pub struct DatasetAnalyzer<'a> {
    dataset: &'a Dataset,
    sensitive_attributes: Vec<String>,
    results: Option<DatasetAnalysis>,
}

impl<'a> DatasetAnalyzer<'a> {
    /// Fails if `sensitive_attributes` is empty or names a missing column.
    pub fn new(dataset: &'a Dataset, sensitive_attributes: Vec<String>) -> Result<Self> {
        if sensitive_attributes.is_empty() {
            return Err(BiasError::EmptyAttributes);
        }

        let missing: Vec<String> = sensitive_attributes
            .iter()
            .filter(|a| !dataset.has_column(a))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BiasError::MissingAttributes(missing));
        }

        Ok(Self {
            dataset,
            sensitive_attributes,
            results: None,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn sensitive_attributes(&self) -> &[String] {
        &self.sensitive_attributes
    }

    /// Recomputes the distribution of every sensitive attribute.
    pub fn analyze(&mut self) -> Result<&DatasetAnalysis> {
        let attributes = self
            .sensitive_attributes
            .iter()
            .map(|attr| distribution_of(self.dataset, attr))
            .collect::<Result<Vec<_>>>()?;

        Ok(&*self.results.insert(DatasetAnalysis { attributes }))
    }

    /// Cached results of the last [`analyze`](Self::analyze) call.
    pub fn results(&self) -> Option<&DatasetAnalysis> {
        self.results.as_ref()
    }

    /// Renders the report, analyzing first if nothing is cached.
    pub fn generate_report(&mut self, detailed: bool) -> Result<String> {
        if let Some(results) = &self.results {
            return Ok(format_dataset_report(results, detailed));
        }
        let results = self.analyze()?;
        Ok(format_dataset_report(results, detailed))
    }
}

/// Counts non-null categories of one column, most frequent first. Equal counts
/// keep the order in which the categories first appear.
fn distribution_of(dataset: &Dataset, attribute: &str) -> Result<AttributeDistribution> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for category in dataset.column(attribute)?.filter_map(|v| v.category()) {
        match index.get(&category) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(category.clone(), order.len());
                order.push((category, 1));
            }
        }
    }

    // stable sort keeps first-appearance order among ties
    order.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

    let total: usize = order.iter().map(|(_, count)| count).sum();
    let categories = order
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            proportion: count as f64 / total as f64,
            count,
        })
        .collect::<Vec<_>>();

    debug!(
        "Attribute '{}': {} categories over {} non-null rows",
        attribute,
        categories.len(),
        total
    );

    Ok(AttributeDistribution {
        attribute: attribute.to_string(),
        total,
        categories,
    })
}
