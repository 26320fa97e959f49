//! In-memory tabular dataset.
//!
//! A [`Dataset`] is an ordered list of named columns and rows of dynamically
//! typed [`Value`] cells. Datasets are usually loaded from a JSON array of
//! records, one object per row.

use crate::error::{BiasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value. NaN counts as missing.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns true for `Null` and for a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// The category key used for grouping, or `None` for missing values.
    pub fn category(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::Text(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Column-named table of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Creates a dataset, checking that column names are unique and that every
    /// row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(BiasError::DuplicateColumn(column.clone()));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(BiasError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Builds a dataset from `(name, values)` column pairs of equal length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<Vec<Value>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();

        let height = values.first().map(Vec::len).unwrap_or(0);
        if let Some((i, column)) = values.iter().enumerate().find(|(_, c)| c.len() != height) {
            return Err(BiasError::InvalidRecords(format!(
                "kolom '{}' memiliki {} nilai, diharapkan {}",
                names[i],
                column.len(),
                height
            )));
        }

        let mut rows = vec![Vec::with_capacity(names.len()); height];
        for column in values {
            for (row, value) in rows.iter_mut().zip(column) {
                row.push(value);
            }
        }

        Self::new(names, rows)
    }

    /// Builds a dataset from JSON objects.
    ///
    /// Column order follows the keys of the first record. Later records may
    /// omit keys (the cell becomes `Null`) but may not add new ones.
    pub fn from_records(records: Vec<serde_json::Map<String, serde_json::Value>>) -> Result<Self> {
        let columns: Vec<String> = records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        let index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let mut row = vec![Value::Null; columns.len()];
            for (key, raw) in record {
                let slot = *index
                    .get(key.as_str())
                    .ok_or_else(|| BiasError::UnknownColumn(key.clone()))?;
                row[slot] = Value::from_json(raw).ok_or_else(|| {
                    BiasError::InvalidRecords(format!(
                        "kolom '{}' pada baris {} bukan nilai skalar",
                        key, i
                    ))
                })?;
            }
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    /// Parses a JSON array of records.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Array(items) = parsed else {
            return Err(BiasError::InvalidRecords(
                "data harus berupa array objek JSON".to_string(),
            ));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                serde_json::Value::Object(map) => Ok(map),
                _ => Err(BiasError::InvalidRecords(format!(
                    "baris {} bukan objek JSON",
                    i
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_records(records)
    }

    /// Loads a JSON records file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&content)?;
        debug!(
            "Loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row cells in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if the column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterates over the cells of one column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| BiasError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Distinct non-null categories of a column in first-appearance order.
    pub fn categories(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for category in self.column(name)?.filter_map(Value::category) {
            if seen.insert(category.clone()) {
                categories.push(category);
            }
        }
        Ok(categories)
    }

    /// Projects the dataset onto the given columns, in the given order.
    pub fn select(&self, columns: &[String]) -> Result<Dataset> {
        let indices = columns
            .iter()
            .map(|c| {
                self.column_index(c)
                    .ok_or_else(|| BiasError::UnknownColumn(c.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Dataset {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Rows whose `column` cell has the given category key.
    pub fn filter_category(&self, column: &str, category: &str) -> Result<Dataset> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| BiasError::UnknownColumn(column.to_string()))?;

        let rows = self
            .rows
            .iter()
            .filter(|row| row[idx].category().as_deref() == Some(category))
            .cloned()
            .collect();

        Ok(Dataset {
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            ("gender", vec!["Pria".into(), "Wanita".into(), Value::Null]),
            ("usia", vec![30.into(), 41.into(), 25.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_transposes() {
        let ds = sample();
        assert_eq!(ds.columns(), &["gender".to_string(), "usia".to_string()]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[1], vec![Value::from("Wanita"), Value::Int(41)]);
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Dataset::from_columns(vec![
            ("a", vec![Value::Int(1), Value::Int(2)]),
            ("b", vec![Value::Int(1)]),
        ]);
        assert!(matches!(result, Err(BiasError::InvalidRecords(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let result = Dataset::new(vec!["a".to_string(), "a".to_string()], vec![]);
        assert!(matches!(result, Err(BiasError::DuplicateColumn(c)) if c == "a"));
    }

    #[test]
    fn test_new_rejects_short_row() {
        let result = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Int(1)]],
        );
        assert!(matches!(
            result,
            Err(BiasError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_from_json_str_keeps_key_order_and_fills_missing() {
        let json = r#"[
            {"ras": "A", "gender": "Pria", "skor": 0.5},
            {"ras": "B", "gender": null}
        ]"#;
        let ds = Dataset::from_json_str(json).unwrap();
        assert_eq!(ds.columns(), &["ras", "gender", "skor"]);
        assert_eq!(ds.rows()[1][2], Value::Null);
        assert_eq!(ds.rows()[0][2], Value::Float(0.5));
    }

    #[test]
    fn test_from_json_str_rejects_unknown_key() {
        let json = r#"[{"a": 1}, {"a": 2, "b": 3}]"#;
        let result = Dataset::from_json_str(json);
        assert!(matches!(result, Err(BiasError::UnknownColumn(c)) if c == "b"));
    }

    #[test]
    fn test_from_json_str_rejects_nested_values() {
        let json = r#"[{"a": [1, 2]}]"#;
        assert!(matches!(
            Dataset::from_json_str(json),
            Err(BiasError::InvalidRecords(_))
        ));
        assert!(matches!(
            Dataset::from_json_str(r#"{"a": 1}"#),
            Err(BiasError::InvalidRecords(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"gender": "Pria"}}, {{"gender": "Wanita"}}]"#).unwrap();

        let ds = Dataset::load(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.has_column("gender"));
    }

    #[test]
    fn test_categories_skip_nulls_and_keep_first_appearance() {
        let ds = Dataset::from_columns(vec![(
            "ras",
            vec!["B".into(), "A".into(), Value::Null, "B".into(), Value::Float(f64::NAN)],
        )])
        .unwrap();
        assert_eq!(ds.categories("ras").unwrap(), vec!["B", "A"]);
    }

    #[test]
    fn test_select_and_filter() {
        let ds = sample();
        let projected = ds.select(&["usia".to_string()]).unwrap();
        assert_eq!(projected.columns(), &["usia".to_string()]);
        assert_eq!(projected.rows()[2], vec![Value::Int(25)]);

        let pria = ds.filter_category("gender", "Pria").unwrap();
        assert_eq!(pria.len(), 1);
        assert_eq!(pria.rows()[0][1], Value::Int(30));

        assert!(matches!(
            ds.select(&["tinggi".to_string()]),
            Err(BiasError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_value_category_and_numeric_view() {
        assert_eq!(Value::from("Pria").category().as_deref(), Some("Pria"));
        assert_eq!(Value::Int(1).category().as_deref(), Some("1"));
        assert_eq!(Value::Null.category(), None);
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
