//! Labeled table: a Polars `DataFrame` plus the name of its row-identifier column.

use crate::error::{ReportError, Result};
use polars::prelude::*;

/// In-memory table whose rows are identified by a unique index column.
///
/// Tables are never mutated after construction; every transformation
/// returns a new `Table`.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    index_column: String,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.index_column == other.index_column && self.frame.equals_missing(&other.frame)
    }
}

impl Table {
    /// Wrap a frame, checking that the index column is present.
    pub fn from_frame(frame: DataFrame, index_column: &str) -> Result<Self> {
        if frame.column(index_column).is_err() {
            return Err(ReportError::MissingColumn(index_column.to_string()));
        }
        Ok(Self {
            frame,
            index_column: index_column.to_string(),
        })
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Look up a column, failing with [`ReportError::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| ReportError::MissingColumn(name.to_string()))
    }

    pub fn is_numeric(&self, name: &str) -> Result<bool> {
        Ok(self.column(name)?.dtype() == &DataType::Float64)
    }

    /// Row identifiers in row order.
    pub fn row_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .text_values(&self.index_column)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    /// Values of a column rendered as text; `None` for missing cells.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let as_text = self.column(name)?.cast(&DataType::String)?;
        let values = as_text
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Values of a numeric column; `None` for missing cells.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        if column.dtype() != &DataType::Float64 {
            return Err(ReportError::NotNumeric(name.to_string()));
        }
        Ok(column.f64()?.into_iter().collect())
    }

    /// Keep the rows whose flag is `true`.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Table> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        let frame = self.frame.filter(&mask)?;
        Ok(Table {
            frame,
            index_column: self.index_column.clone(),
        })
    }

    /// Copy of this table with `column` added or replaced.
    pub fn with_column(&self, column: Column) -> Result<Table> {
        let mut frame = self.frame.clone();
        frame.with_column(column)?;
        Ok(Table {
            frame,
            index_column: self.index_column.clone(),
        })
    }
}
