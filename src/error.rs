//! Error types shared by the loading, cleaning, aggregation and rendering stages.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a CSV file into a [`Table`](crate::data::Table).
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV has no header row")]
    EmptyHeader,
    #[error("Row {line} has {found} fields, header declares {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Index column '{0}' not found in header")]
    MissingIndexColumn(String),
    #[error("Index column '{column}' has no value on line {line}")]
    EmptyIndex { column: String, line: u64 },
    #[error("Duplicate index value '{value}' on lines {first_line} and {line}")]
    DuplicateIndex {
        value: String,
        first_line: u64,
        line: u64,
    },
}

/// Any failure of a chart pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to load data: {0}")]
    DataLoad(#[from] DataLoadError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}', row '{row}': cannot parse '{value}' as a number")]
    TypeCoercion {
        column: String,
        row: String,
        value: String,
    },
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("Cannot fit a line: {0}")]
    DegenerateFit(String),
    #[error("Polars error: {0}")]
    Frame(#[from] PolarsError),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Invalid chart config: {0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
