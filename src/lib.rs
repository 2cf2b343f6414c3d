//! CPS Charts - cleaning, aggregation and static charts for the Chicago
//! Public Schools progress report cards.
//!
//! Each chart is a linear pipeline over one loaded [`data::Table`]:
//! clean the columns it needs, aggregate, then render to PNG.

pub mod charts;
pub mod data;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use error::{DataLoadError, ReportError, Result};
pub use pipeline::{ChartKind, ChartReport};
