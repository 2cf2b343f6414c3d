//! Chart configuration.
//!
//! Every figure property lives in a [`ChartConfig`] handed to the renderer
//! per call. Defaults reproduce the report-card charts; a JSON file may
//! override any subset of fields.

use crate::dataset;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_label: String,
    pub y_min: f64,
    pub y_max: f64,
    /// Width of one bar in group units; series sit side by side.
    pub bar_width: f64,
    /// One colour per value series.
    pub colors: Vec<String>,
    pub label_font_size: u32,
    pub title_font_size: u32,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1500,
            title: "Environment and Safety Score by School Network".to_string(),
            y_label: "Score".to_string(),
            y_min: 0.0,
            y_max: 100.0,
            bar_width: 0.35,
            colors: vec!["indianred".to_string(), "cornflowerblue".to_string()],
            label_font_size: 10,
            title_font_size: 20,
        }
    }
}

/// One pie of the grid: which column it counts and how it looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiePanel {
    pub column: String,
    pub title: String,
    pub palette: Vec<String>,
}

impl PiePanel {
    fn new(column: &str, title: &str, palette: [&str; 3]) -> Self {
        Self {
            column: column.to_string(),
            title: title.to_string(),
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieGridStyle {
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub cols: usize,
    /// Degrees counter-clockwise from 3 o'clock where the first slice starts.
    pub start_angle: f64,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub panels: Vec<PiePanel>,
}

impl Default for PieGridStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            rows: 2,
            cols: 2,
            start_angle: 270.0,
            title_font_size: 18,
            label_font_size: 14,
            panels: vec![
                PiePanel::new(
                    dataset::PARENT_ENGAGEMENT_ICON,
                    "Parent Engagement",
                    ["aqua", "crimson", "wheat"],
                ),
                PiePanel::new(
                    dataset::PARENT_ENVIRONMENT_ICON,
                    "Parent Environment",
                    ["mistyrose", "gold", "teal"],
                ),
                PiePanel::new(
                    dataset::ADEQUATE_YEARLY_PROGRESS,
                    "Made Adequate Yearly Progress",
                    ["grey", "lightcoral", "lightgrey"],
                ),
                PiePanel::new(
                    dataset::PERFORMANCE_POLICY_LEVEL,
                    "CPS Performance Policy Level",
                    ["darkcyan", "coral", "lime"],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_column: String,
    pub y_column: String,
    pub x_label: String,
    pub y_label: String,
    pub point_color: String,
    pub line_color: String,
    pub point_size: u32,
    pub font_size: u32,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: "College Enrollment Rate Vs. School Instruction Score".to_string(),
            x_column: dataset::INSTRUCTION_SCORE.to_string(),
            y_column: dataset::COLLEGE_ENROLLMENT_RATE.to_string(),
            x_label: "Instruction Score".to_string(),
            y_label: "College Enrollment Rate (%)".to_string(),
            point_color: "red".to_string(),
            line_color: "tab:blue".to_string(),
            point_size: 3,
            font_size: 14,
        }
    }
}

/// Figure configuration for all three charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub bar: BarChartStyle,
    pub pies: PieGridStyle,
    pub scatter: ScatterStyle,
}

impl ChartConfig {
    /// Read a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(text)
            .map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject layouts the renderer cannot draw.
    pub fn validate(&self) -> Result<()> {
        let bar = &self.bar;
        if !(bar.y_min < bar.y_max) {
            return Err(ReportError::Config(format!(
                "bar y range {}..{} is empty",
                bar.y_min, bar.y_max
            )));
        }
        if bar.bar_width <= 0.0 || bar.colors.is_empty() {
            return Err(ReportError::Config(
                "bar chart needs a positive bar width and at least one colour".to_string(),
            ));
        }
        let pies = &self.pies;
        if pies.panels.len() > pies.rows * pies.cols {
            return Err(ReportError::Config(format!(
                "{} pie panels do not fit a {}x{} grid",
                pies.panels.len(),
                pies.rows,
                pies.cols
            )));
        }
        if let Some(panel) = pies.panels.iter().find(|p| p.palette.is_empty()) {
            return Err(ReportError::Config(format!(
                "pie '{}' has an empty palette",
                panel.title
            )));
        }
        Ok(())
    }
}
