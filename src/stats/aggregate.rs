//! Group means and category frequency counts.

use crate::data::Table;
use crate::error::Result;
use log::debug;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Mean of one value column for every group.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanSeries {
    pub value_column: String,
    /// Aligned with [`GroupedMeans::groups`]; `NaN` when a group has no value.
    pub means: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Per-group means of several value columns over one shared group order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeans {
    pub group_column: String,
    /// Ascending by key.
    pub groups: Vec<String>,
    pub series: Vec<MeanSeries>,
}

impl GroupedMeans {
    pub fn series(&self, value_column: &str) -> Option<&MeanSeries> {
        self.series.iter().find(|s| s.value_column == value_column)
    }

    pub fn mean(&self, group: &str, value_column: &str) -> Option<f64> {
        let idx = self.groups.iter().position(|g| g == group)?;
        self.series(value_column).map(|s| s.means[idx])
    }

    /// One row per group, one column per value column.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new(
            self.group_column.as_str().into(),
            self.groups.clone(),
        )];
        for s in &self.series {
            columns.push(Column::new(s.value_column.as_str().into(), s.means.clone()));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Number of rows holding one category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Category counts of one column, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<CategoryCount>,
    pub total: usize,
}

impl FrequencyTable {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.count).collect()
    }

    /// Share of each category in percent, rounded half to even.
    pub fn percentages(&self) -> Vec<u32> {
        if self.total == 0 {
            return vec![0; self.entries.len()];
        }
        self.entries
            .iter()
            .map(|e| (e.count as f64 / self.total as f64 * 100.0).round_ties_even() as u32)
            .collect()
    }
}

/// Grouping and counting over cleaned tables.
pub struct Aggregator;

impl Aggregator {
    /// Mean of each of `value_columns` within each group of `group_column`.
    ///
    /// Rows with a missing group key are ignored. Groups are ordered by key.
    pub fn group_means(
        table: &Table,
        group_column: &str,
        value_columns: &[&str],
    ) -> Result<GroupedMeans> {
        let keys = table.text_values(group_column)?;
        let values = value_columns
            .iter()
            .map(|name| table.numeric_values(name))
            .collect::<Result<Vec<_>>>()?;

        // group -> per value column (sum, count)
        let mut acc: BTreeMap<String, Vec<(f64, usize)>> = BTreeMap::new();
        for (row, key) in keys.iter().enumerate() {
            let Some(key) = key else {
                continue;
            };
            let slots = acc
                .entry(key.clone())
                .or_insert_with(|| vec![(0.0, 0); value_columns.len()]);
            for (slot, column) in slots.iter_mut().zip(&values) {
                if let Some(v) = column[row].filter(|v| !v.is_nan()) {
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
        }

        let groups: Vec<String> = acc.keys().cloned().collect();
        let series = value_columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let (means, counts) = acc
                    .values()
                    .map(|slots| {
                        let (sum, n) = slots[i];
                        let mean = if n == 0 { f64::NAN } else { sum / n as f64 };
                        (mean, n)
                    })
                    .unzip();
                MeanSeries {
                    value_column: name.to_string(),
                    means,
                    counts,
                }
            })
            .collect();

        debug!(
            "Grouped {} rows by '{}' into {} groups",
            table.height(),
            group_column,
            groups.len()
        );

        Ok(GroupedMeans {
            group_column: group_column.to_string(),
            groups,
            series,
        })
    }

    /// Count rows per distinct value of `column`, most frequent first.
    ///
    /// Ties keep the order in which the values first appear. Missing cells
    /// are not counted.
    pub fn frequency_counts(table: &Table, column: &str) -> Result<FrequencyTable> {
        let mut entries: Vec<CategoryCount> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for value in table.text_values(column)?.into_iter().flatten() {
            match positions.get(&value) {
                Some(&idx) => entries[idx].count += 1,
                None => {
                    positions.insert(value.clone(), entries.len());
                    entries.push(CategoryCount {
                        label: value,
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        let total = entries.iter().map(|e| e.count).sum();

        Ok(FrequencyTable {
            column: column.to_string(),
            entries,
            total,
        })
    }
}
