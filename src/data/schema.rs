//! Column type declarations applied when a table is loaded.

use crate::data::Table;
use crate::error::{ReportError, Result};

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Free text, kept as read.
    Text,
    /// Text with a small set of distinct values (network names, icons, levels).
    Categorical,
    /// Loaded as text, parsed to `f64` by the cleaner once missing rows are dropped.
    Numeric,
}

/// Declared columns of a table. Columns not listed here load as text.
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, name: &str) -> Self {
        self.with(name, ColumnType::Text)
    }

    pub fn categorical(self, name: &str) -> Self {
        self.with(name, ColumnType::Categorical)
    }

    pub fn numeric(self, name: &str) -> Self {
        self.with(name, ColumnType::Numeric)
    }

    /// Declare (or redeclare) a column.
    pub fn with(mut self, name: &str, kind: ColumnType) -> Self {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = kind,
            None => self.columns.push((name.to_string(), kind)),
        }
        self
    }

    /// Merge another schema into this one; later declarations win.
    pub fn merge(self, other: &TableSchema) -> Self {
        other
            .columns
            .iter()
            .fold(self, |acc, (name, kind)| acc.with(name, *kind))
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, kind)| *kind)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(n, k)| (n.as_str(), *k))
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(_, kind)| *kind == ColumnType::Numeric)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Check that every declared column exists in `table`.
    pub fn validate(&self, table: &Table) -> Result<()> {
        match self.columns().find(|(name, _)| !table.has_column(name)) {
            Some((name, _)) => Err(ReportError::MissingColumn(name.to_string())),
            None => Ok(()),
        }
    }
}
