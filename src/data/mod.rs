//! Data module - CSV loading, schema declaration and cleaning

mod cleaner;
mod loader;
mod schema;
mod sentinel;
mod table;

pub use cleaner::Cleaner;
pub use loader::DataLoader;
pub use schema::{ColumnType, TableSchema};
pub use sentinel::{SentinelSet, DEFAULT_SENTINELS};
pub use table::Table;
