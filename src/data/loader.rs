//! CSV Data Loader Module
//! Reads the report-card CSV into a [`Table`] of text columns and checks the
//! declared schema against its header. Numeric parsing is left to the
//! [`Cleaner`](crate::data::Cleaner), after rows with missing values are gone.

use crate::data::{Table, TableSchema};
use crate::error::{DataLoadError, Result};
use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads CSV files into tables indexed by a unique identifier column.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    index_column: Option<String>,
    schema: TableSchema,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `name` as the row identifier instead of the first column.
    pub fn with_index_column(mut self, name: &str) -> Self {
        self.index_column = Some(name.to_string());
        self
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Load a CSV file from disk.
    pub fn load_csv(&self, path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.load_reader(file)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            table.height(),
            table.column_names().len(),
            path.display()
        );
        Ok(table)
    }

    /// Load CSV text from any reader.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(DataLoadError::from)?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataLoadError::EmptyHeader.into());
        }

        let index_name = self
            .index_column
            .clone()
            .unwrap_or_else(|| headers[0].clone());
        let index_pos = headers
            .iter()
            .position(|h| h == &index_name)
            .ok_or_else(|| DataLoadError::MissingIndexColumn(index_name.clone()))?;

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut seen: HashMap<String, u64> = HashMap::new();

        for record in csv_reader.records() {
            let record = record.map_err(DataLoadError::from)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != headers.len() {
                return Err(DataLoadError::RaggedRow {
                    line,
                    expected: headers.len(),
                    found: record.len(),
                }
                .into());
            }

            let id = record.get(index_pos).unwrap_or_default().trim();
            if id.is_empty() {
                return Err(DataLoadError::EmptyIndex {
                    column: index_name.clone(),
                    line,
                }
                .into());
            }
            if let Some(&first_line) = seen.get(id) {
                return Err(DataLoadError::DuplicateIndex {
                    value: id.to_string(),
                    first_line,
                    line,
                }
                .into());
            }
            seen.insert(id.to_string(), line);

            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                });
            }
        }

        let columns: Vec<Column> = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name.as_str().into(), values))
            .collect();

        let frame = DataFrame::new(columns)?;
        let table = Table::from_frame(frame, &index_name)?;
        self.schema.validate(&table)?;
        debug!(
            "Parsed {} records, index column '{}'",
            table.height(),
            index_name
        );
        Ok(table)
    }
}
