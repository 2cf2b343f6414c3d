//! Data Cleaner Module
//! Sentinel normalization, missing-row removal and numeric coercion.
//!
//! Every operation is pure: it takes a `&Table` and returns a new one.

use crate::data::{SentinelSet, Table};
use crate::error::{ReportError, Result};
use log::debug;
use polars::prelude::*;

/// Removes rows with missing values in target columns.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    sentinels: SentinelSet,
}

impl Cleaner {
    pub fn new(sentinels: SentinelSet) -> Self {
        Self { sentinels }
    }

    /// Replace sentinel markers in the text columns `columns` with nulls.
    pub fn normalize_sentinels(&self, table: &Table, columns: &[&str]) -> Result<Table> {
        let mut out = table.clone();
        for &name in columns {
            if table.is_numeric(name)? {
                continue;
            }
            let values: Vec<Option<String>> = table
                .text_values(name)?
                .into_iter()
                .map(|v| self.sentinels.normalize(v.as_deref()).map(str::to_string))
                .collect();
            out = out.with_column(Column::new(name.into(), values))?;
        }
        Ok(out)
    }

    /// Drop every row where any of `targets` is missing, blank or a sentinel.
    pub fn drop_missing(&self, table: &Table, targets: &[&str]) -> Result<Table> {
        let normalized = self.normalize_sentinels(table, targets)?;
        let mut keep = vec![true; normalized.height()];

        for &name in targets {
            if normalized.is_numeric(name)? {
                for (flag, value) in keep.iter_mut().zip(normalized.numeric_values(name)?) {
                    *flag &= value.is_some_and(|v| !v.is_nan());
                }
            } else {
                for (flag, value) in keep.iter_mut().zip(normalized.text_values(name)?) {
                    *flag &= value.is_some();
                }
            }
        }

        let cleaned = normalized.filter_rows(&keep)?;
        debug!(
            "Cleaning on {:?} dropped {} of {} rows",
            targets,
            table.height() - cleaned.height(),
            table.height()
        );
        Ok(cleaned)
    }

    /// Convert text columns to `f64`. Sentinels become nulls; anything else
    /// that does not parse fails with [`ReportError::TypeCoercion`].
    pub fn coerce_numeric(&self, table: &Table, columns: &[&str]) -> Result<Table> {
        let mut out = table.clone();
        let row_ids = table.row_ids()?;
        for &name in columns {
            if table.is_numeric(name)? {
                continue;
            }
            let values = table.text_values(name)?;
            let column = parse_numeric_column(name, &values, &row_ids, &self.sentinels)?;
            out = out.with_column(column)?;
        }
        Ok(out)
    }

    /// Drop rows missing any of `targets`, then coerce `numeric` to `f64`.
    pub fn clean(&self, table: &Table, targets: &[&str], numeric: &[&str]) -> Result<Table> {
        let dropped = self.drop_missing(table, targets)?;
        self.coerce_numeric(&dropped, numeric)
    }
}

/// Parse text cells into a nullable `f64` column.
fn parse_numeric_column(
    name: &str,
    values: &[Option<String>],
    row_ids: &[String],
    sentinels: &SentinelSet,
) -> Result<Column> {
    let mut parsed = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        match sentinels.normalize(value.as_deref()) {
            None => parsed.push(None),
            Some(text) => {
                let number =
                    text.trim()
                        .parse::<f64>()
                        .map_err(|_| ReportError::TypeCoercion {
                            column: name.to_string(),
                            row: row_ids.get(i).cloned().unwrap_or_default(),
                            value: text.to_string(),
                        })?;
                parsed.push(Some(number));
            }
        }
    }
    Ok(Column::new(name.into(), parsed))
}
