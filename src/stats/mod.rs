//! Stats module - group means, frequency counts and line fitting

mod aggregate;
mod regression;

pub use aggregate::{Aggregator, CategoryCount, FrequencyTable, GroupedMeans, MeanSeries};
pub use regression::{LinearFit, SIGNIFICANCE_THRESHOLD};
