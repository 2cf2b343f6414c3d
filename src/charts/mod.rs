//! Charts module - Chart configuration and static rendering

pub mod config;
pub mod palette;
mod renderer;

pub use config::{BarChartStyle, ChartConfig, PieGridStyle, PiePanel, ScatterStyle};
pub use renderer::{PieChartData, ScatterData, StaticChartRenderer};
