//! Chart pipelines: load → clean → aggregate → render.
//!
//! Each chart reads the same base table and cleans its own copy, so the
//! pipelines can run one after another on a single load.

use crate::charts::{
    ChartConfig, PieChartData, PieGridStyle, ScatterData, ScatterStyle, StaticChartRenderer,
};
use crate::data::{Cleaner, DataLoader, Table, TableSchema};
use crate::dataset::{self, ENVIRONMENT_SCORE, NETWORK_MANAGER, SAFETY_SCORE};
use crate::error::{ReportError, Result};
use crate::stats::{Aggregator, GroupedMeans, LinearFit};
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Which chart to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pies,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Pies, ChartKind::Scatter];

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar_chart",
            ChartKind::Pies => "pie_charts",
            ChartKind::Scatter => "scatter_plot",
        }
    }

    /// Columns this chart needs, with their types.
    pub fn schema(self, config: &ChartConfig) -> TableSchema {
        match self {
            ChartKind::Bar => dataset::bar_schema(),
            ChartKind::Pies => config
                .pies
                .panels
                .iter()
                .fold(TableSchema::new(), |schema, panel| schema.categorical(&panel.column)),
            ChartKind::Scatter => TableSchema::new()
                .numeric(&config.scatter.x_column)
                .numeric(&config.scatter.y_column),
        }
    }
}

/// Mean Environment and Safety scores per school network.
pub fn bar_chart_data(table: &Table, cleaner: &Cleaner) -> Result<GroupedMeans> {
    let values = [ENVIRONMENT_SCORE, SAFETY_SCORE];
    let cleaned = cleaner.clean(table, &values, &values)?;
    Aggregator::group_means(&cleaned, NETWORK_MANAGER, &values)
}

/// Category counts for each configured pie, each cleaned on its own column.
pub fn pie_chart_data(
    table: &Table,
    cleaner: &Cleaner,
    style: &PieGridStyle,
) -> Result<Vec<PieChartData>> {
    style
        .panels
        .iter()
        .map(|panel| -> Result<PieChartData> {
            let cleaned = cleaner.drop_missing(table, &[panel.column.as_str()])?;
            Ok(PieChartData {
                title: panel.title.clone(),
                palette: panel.palette.clone(),
                counts: Aggregator::frequency_counts(&cleaned, &panel.column)?,
            })
        })
        .collect()
}

/// Paired points and least-squares fit for the scatter plot.
pub fn scatter_data(
    table: &Table,
    cleaner: &Cleaner,
    style: &ScatterStyle,
) -> Result<ScatterData> {
    let columns = [style.x_column.as_str(), style.y_column.as_str()];
    let cleaned = cleaner.clean(table, &columns, &columns)?;
    let points = LinearFit::paired_points(&cleaned, &style.x_column, &style.y_column)?;
    let fit = LinearFit::fit(&points)?;
    Ok(ScatterData { points, fit })
}

/// Runs chart pipelines and writes their images (and optional CSV summaries).
pub struct ChartReport {
    config: ChartConfig,
    cleaner: Cleaner,
    output_dir: PathBuf,
    export_summary: bool,
}

impl ChartReport {
    pub fn new(config: ChartConfig, output_dir: &Path) -> Self {
        Self {
            config,
            cleaner: Cleaner::default(),
            output_dir: output_dir.to_path_buf(),
            export_summary: false,
        }
    }

    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_summary_export(mut self, export: bool) -> Self {
        self.export_summary = export;
        self
    }

    /// Load `data_file` once, checking it has the columns every requested
    /// chart needs. Values stay text until each chart cleans its own copy.
    pub fn load(&self, data_file: &Path, kinds: &[ChartKind]) -> Result<Table> {
        let schema = kinds
            .iter()
            .fold(TableSchema::new(), |acc, kind| acc.merge(&kind.schema(&self.config)));
        DataLoader::new().with_schema(schema).load_csv(data_file)
    }

    /// Load the data file and produce every chart in `kinds`.
    pub fn run(&self, data_file: &Path, kinds: &[ChartKind]) -> Result<Vec<PathBuf>> {
        let table = self.load(data_file, kinds)?;
        kinds.iter().map(|&kind| self.render(&table, kind)).collect()
    }

    /// Produce one chart from an already loaded table. Returns the image path.
    pub fn render(&self, table: &Table, kind: ChartKind) -> Result<PathBuf> {
        self.config.validate()?;
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let image = self.output_dir.join(format!("{}.png", kind.file_stem()));

        let summary = match kind {
            ChartKind::Bar => {
                let means = bar_chart_data(table, &self.cleaner)?;
                StaticChartRenderer::render_bar(&means, &self.config.bar, &image)?;
                means.to_frame()?
            }
            ChartKind::Pies => {
                let pies = pie_chart_data(table, &self.cleaner, &self.config.pies)?;
                StaticChartRenderer::render_pies(&pies, &self.config.pies, &image)?;
                pie_summary_frame(&pies)?
            }
            ChartKind::Scatter => {
                let scatter = scatter_data(table, &self.cleaner, &self.config.scatter)?;
                let fit = &scatter.fit;
                info!(
                    "Regression over {} schools: slope {:.3}, intercept {:.3}, r {:.3} ({})",
                    fit.n,
                    fit.slope,
                    fit.intercept,
                    fit.r,
                    significance(fit)
                );
                StaticChartRenderer::render_scatter(&scatter, &self.config.scatter, &image)?;
                fit_summary_frame(&scatter.fit)?
            }
        };

        if self.export_summary {
            let path = self.output_dir.join(format!("{}_summary.csv", kind.file_stem()));
            write_csv(summary, &path)?;
        }
        Ok(image)
    }
}

fn significance(fit: &LinearFit) -> String {
    match fit.p_value {
        Some(p) if fit.is_significant() => format!("significant, p = {p:.4}"),
        Some(p) => format!("not significant, p = {p:.4}"),
        None => "p undefined".to_string(),
    }
}

/// Long-format counts of every pie: chart, category, count, percent.
pub fn pie_summary_frame(pies: &[PieChartData]) -> Result<DataFrame> {
    let mut charts = Vec::new();
    let mut categories = Vec::new();
    let mut counts = Vec::new();
    let mut percents = Vec::new();
    for pie in pies {
        for (entry, pct) in pie.counts.entries.iter().zip(pie.counts.percentages()) {
            charts.push(pie.title.clone());
            categories.push(entry.label.clone());
            counts.push(entry.count as u64);
            percents.push(pct);
        }
    }
    Ok(DataFrame::new(vec![
        Column::new("chart".into(), charts),
        Column::new("category".into(), categories),
        Column::new("count".into(), counts),
        Column::new("percent".into(), percents),
    ])?)
}

pub fn fit_summary_frame(fit: &LinearFit) -> Result<DataFrame> {
    let metrics = vec!["slope", "intercept", "n", "r", "r_squared", "p_value"];
    let values = vec![
        Some(fit.slope),
        Some(fit.intercept),
        Some(fit.n as f64),
        Some(fit.r),
        Some(fit.r_squared()),
        fit.p_value,
    ];
    Ok(DataFrame::new(vec![
        Column::new("metric".into(), metrics),
        Column::new("value".into(), values),
    ])?)
}

fn write_csv(mut frame: DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).finish(&mut frame)?;
    info!("Wrote summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::*;

    fn report_table() -> Table {
        let csv = format!(
            "School ID,{NETWORK_MANAGER},{ENVIRONMENT_SCORE},{SAFETY_SCORE},{PARENT_ENGAGEMENT_ICON},{INSTRUCTION_SCORE},{COLLEGE_ENROLLMENT_RATE}\n\
             1,North,10,40,Strong,20,30\n\
             2,North,20,NDA,Weak,40,50\n\
             3,South,30,60,NDA,60,70\n\
             4,South,NDA,70,Strong,NDA,80\n\
             5,,50,50,Not Enough Data,80,90\n"
        );
        let schema = dataset::bar_schema()
            .categorical(PARENT_ENGAGEMENT_ICON)
            .numeric(INSTRUCTION_SCORE)
            .numeric(COLLEGE_ENROLLMENT_RATE);
        DataLoader::new()
            .with_schema(schema)
            .load_reader(csv.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_bar_pipeline_drops_rows_missing_either_score() {
        let means = bar_chart_data(&report_table(), &Cleaner::default()).unwrap();
        // Row 2 lacks safety, row 4 lacks environment, row 5 has no network.
        assert_eq!(means.groups, vec!["North", "South"]);
        assert_eq!(means.mean("North", ENVIRONMENT_SCORE), Some(10.0));
        assert_eq!(means.mean("South", SAFETY_SCORE), Some(60.0));
    }

    #[test]
    fn test_pie_pipeline_cleans_per_panel() {
        let style = PieGridStyle {
            panels: vec![PieGridStyle::default().panels[0].clone()],
            ..PieGridStyle::default()
        };
        let pies = pie_chart_data(&report_table(), &Cleaner::default(), &style).unwrap();
        assert_eq!(pies.len(), 1);
        assert_eq!(pies[0].title, "Parent Engagement");
        assert_eq!(pies[0].counts.labels(), vec!["Strong", "Weak"]);
        assert_eq!(pies[0].counts.total, 3);
    }

    #[test]
    fn test_scatter_pipeline() {
        let scatter =
            scatter_data(&report_table(), &Cleaner::default(), &ScatterStyle::default()).unwrap();
        assert_eq!(scatter.points.len(), 4);
        assert!((scatter.fit.slope - 1.0).abs() < 1e-9);
        assert!((scatter.fit.intercept - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_schema_follows_config() {
        let mut config = ChartConfig::default();
        config.scatter.x_column = "Teachers Score".to_string();
        let schema = ChartKind::Scatter.schema(&config);
        assert_eq!(
            schema.numeric_columns(),
            vec!["Teachers Score", COLLEGE_ENROLLMENT_RATE]
        );
        assert_eq!(ChartKind::Pies.schema(&config).columns().count(), 4);
    }

    #[test]
    fn test_summary_frames() {
        let table = report_table();
        let pies = pie_chart_data(&table, &Cleaner::default(), &PieGridStyle {
            panels: vec![PieGridStyle::default().panels[0].clone()],
            ..PieGridStyle::default()
        })
        .unwrap();
        assert_eq!(pie_summary_frame(&pies).unwrap().shape(), (2, 4));

        let fit = LinearFit::fit(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        let frame = fit_summary_frame(&fit).unwrap();
        assert_eq!(frame.shape(), (6, 2));
        assert_eq!(frame.column("value").unwrap().null_count(), 1);
    }

    #[test]
    fn test_bar_pipeline_drops_junk_before_coercing() {
        let csv = format!(
            "School ID,{NETWORK_MANAGER},{ENVIRONMENT_SCORE},{SAFETY_SCORE}\n\
             1,A,10,20\n\
             2,A,n/a,NDA\n\
             3,B,30,40\n"
        );
        let table = DataLoader::new()
            .with_schema(dataset::bar_schema())
            .load_reader(csv.as_bytes())
            .unwrap();
        let means = bar_chart_data(&table, &Cleaner::default()).unwrap();
        assert_eq!(means.groups, vec!["A", "B"]);
        assert_eq!(means.mean("A", ENVIRONMENT_SCORE), Some(10.0));
        assert_eq!(means.series(ENVIRONMENT_SCORE).unwrap().counts, vec![1, 1]);
    }

    #[test]
    fn test_report_uses_its_cleaner() {
        let dir = tempfile::tempdir().unwrap();
        let report = ChartReport::new(ChartConfig::default(), dir.path())
            .with_cleaner(Cleaner::new(crate::data::SentinelSet::new(["Weak"])));
        let style = PieGridStyle {
            panels: vec![PieGridStyle::default().panels[0].clone()],
            ..PieGridStyle::default()
        };
        let pies = pie_chart_data(&report_table(), &report.cleaner, &style).unwrap();
        // "NDA" is an ordinary category once the markers are replaced.
        assert_eq!(pies[0].counts.labels(), vec!["Strong", "NDA", "Not Enough Data"]);
    }

    #[test]
    fn test_significance_wording() {
        let exact = LinearFit::fit(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        assert_eq!(significance(&exact), "p undefined");

        let noisy =
            LinearFit::fit(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 5.0), (5.0, 4.0)]).unwrap();
        assert!(significance(&noisy).starts_with("not significant, p = "));

        let strong = LinearFit::fit(&[
            (1.0, 1.1),
            (2.0, 1.9),
            (3.0, 3.2),
            (4.0, 3.9),
            (5.0, 5.1),
            (6.0, 6.0),
        ])
        .unwrap();
        assert!(significance(&strong).starts_with("significant, p = "));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ChartConfig::default();
        config.bar.colors.clear();
        let report = ChartReport::new(config, dir.path());
        let err = report.render(&report_table(), ChartKind::Bar).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
        assert!(!dir.path().join("bar_chart.png").exists());
    }
}
