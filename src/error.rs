use std::path::PathBuf;

use thiserror::Error;

/// Faults that abort an ETL run.
///
/// Everything is propagated as `anyhow::Error`; these variants are attached at
/// the point of failure so callers can `downcast_ref::<EtlError>()` to find out
/// which kind of fault stopped the run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Unsupported file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Cannot convert '{value}' to float in column '{column}' at row {row}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Row {row} has {found} field(s) but the header defines {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported relational store '{0}' (expected a sqlite connection string)")]
    UnsupportedStore(String),
}
