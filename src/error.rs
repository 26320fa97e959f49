//! Error types for the bias detector library.

use thiserror::Error;

/// Error returned by a [`Classifier`](crate::classifier::Classifier) prediction.
pub type PredictionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for dataset and model analysis.
#[derive(Debug, Error)]
pub enum BiasError {
    #[error("Daftar 'sensitive_attributes' tidak boleh kosong.")]
    EmptyAttributes,

    #[error("Atribut sensitif berikut tidak ditemukan di dataset: {}", .0.join(", "))]
    MissingAttributes(Vec<String>),

    #[error("Variabel target '{0}' tidak ditemukan di dataset.")]
    MissingTarget(String),

    #[error("Model '{0}' harus berupa classifier.")]
    NotAClassifier(String),

    #[error("Dataset tidak memiliki baris untuk dianalisis.")]
    EmptyDataset,

    #[error("Kolom '{0}' muncul lebih dari sekali.")]
    DuplicateColumn(String),

    #[error("Baris {row} memiliki {found} nilai, diharapkan {expected}.")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Kolom '{0}' tidak dikenal.")]
    UnknownColumn(String),

    #[error("Format data tidak valid: {0}")]
    InvalidRecords(String),

    #[error("Model menghasilkan {found} prediksi untuk {expected} baris.")]
    PredictionLength { expected: usize, found: usize },

    #[error(transparent)]
    Prediction(PredictionError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, BiasError>;
