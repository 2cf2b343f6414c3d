use cps_charts::charts::ChartConfig;
use cps_charts::data::{Cleaner, Table};
use cps_charts::dataset::*;
use cps_charts::pipeline::{bar_chart_data, pie_chart_data, scatter_data};
use cps_charts::{ChartKind, ChartReport, DataLoadError, ReportError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/progress_report_sample.csv")
}

fn load_all() -> Table {
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    report
        .load(&fixture(), &ChartKind::ALL)
        .expect("Failed to load fixture")
}

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

#[test]
fn test_fixture_loads_with_every_chart_schema() {
    let table = load_all();
    assert_eq!(table.height(), 12);
    assert_eq!(table.index_column(), "School ID");
    // Scores stay text until a chart cleans them.
    assert!(!table.is_numeric(ENVIRONMENT_SCORE).unwrap());
    assert!(table.has_column(COLLEGE_ENROLLMENT_RATE));
    assert!(table.has_column(PARENT_ENGAGEMENT_ICON));
}

#[test]
fn test_bar_chart_means_per_network() {
    let means = bar_chart_data(&load_all(), &Cleaner::default()).unwrap();
    assert_eq!(
        means.groups,
        vec![
            "Fullerton Elementary Network",
            "Midway Elementary Network",
            "North-Northwest Side High School Network",
            "Ravenswood-Ridge Elementary Network",
            "Skyway Elementary Network",
            "Southwest Side High School Network",
            "West Side High School Network",
        ]
    );
    let env = means.series(ENVIRONMENT_SCORE).unwrap();
    let safety = means.series(SAFETY_SCORE).unwrap();
    assert_eq!(env.means.len(), safety.means.len());

    assert_eq!(means.mean("Fullerton Elementary Network", ENVIRONMENT_SCORE), Some(62.5));
    assert_eq!(means.mean("Fullerton Elementary Network", SAFETY_SCORE), Some(68.0));
    let southwest = means
        .mean("Southwest Side High School Network", ENVIRONMENT_SCORE)
        .unwrap();
    assert!((southwest - 134.0 / 3.0).abs() < 1e-9);
    assert_eq!(means.mean("Southwest Side High School Network", SAFETY_SCORE), Some(51.0));
    // Burnham Park's only school has no safety score.
    assert_eq!(means.mean("Burnham Park Elementary Network", SAFETY_SCORE), None);
}

#[test]
fn test_pie_counts_per_panel() {
    let config = ChartConfig::default();
    let pies = pie_chart_data(&load_all(), &Cleaner::default(), &config.pies).unwrap();
    assert_eq!(pies.len(), 4);

    let engagement = &pies[0].counts;
    assert_eq!(engagement.labels(), vec!["Average", "Weak", "Strong"]);
    assert_eq!(engagement.counts(), vec![4, 4, 2]);
    assert_eq!(engagement.percentages(), vec![40, 40, 20]);

    let ayp = &pies[2].counts;
    assert_eq!(ayp.labels(), vec!["No", "Yes"]);
    assert_eq!(ayp.percentages(), vec![83, 17]);

    let policy = &pies[3].counts;
    assert_eq!(policy.labels(), vec!["Level 2", "Level 1", "Level 3"]);
    assert_eq!(policy.total, 11);

    for pie in &pies {
        assert!(!pie.counts.labels().iter().any(|l| *l == "NDA" || *l == "Not Enough Data"));
    }
}

#[test]
fn test_scatter_fit_over_high_schools() {
    let config = ChartConfig::default();
    let scatter = scatter_data(&load_all(), &Cleaner::default(), &config.scatter).unwrap();
    assert_eq!(scatter.points.len(), 5);
    assert!((scatter.fit.slope - 306.0 / 226.8).abs() < 1e-9);
    assert!((scatter.fit.intercept - 8.0).abs() < 1e-9);
    assert!(scatter.fit.r > 0.9);
}

#[test]
fn test_base_table_survives_every_pipeline() {
    let table = load_all();
    let snapshot = table.clone();
    let config = ChartConfig::default();
    let cleaner = Cleaner::default();
    bar_chart_data(&table, &cleaner).unwrap();
    pie_chart_data(&table, &cleaner, &config.pies).unwrap();
    scatter_data(&table, &cleaner, &config.scatter).unwrap();
    assert_eq!(table, snapshot);
}

#[test]
fn test_missing_file_is_a_load_error() {
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    let err = report
        .load(Path::new("no_such_report.csv"), &[ChartKind::Bar])
        .unwrap_err();
    assert!(matches!(err, ReportError::DataLoad(DataLoadError::Io { .. })));
}

#[test]
fn test_missing_column_fails_at_load() {
    let csv = create_temp_csv("School ID,Network Manager,Environment Score\n1,A,10\n");
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    let err = report.load(csv.path(), &[ChartKind::Bar]).unwrap_err();
    assert!(matches!(err, ReportError::MissingColumn(c) if c == SAFETY_SCORE));
}

#[test]
fn test_duplicate_school_id_fails_at_load() {
    let csv = create_temp_csv(
        "School ID,Network Manager,Environment Score,Safety Score\n1,A,10,20\n1,B,30,40\n",
    );
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    let err = report.load(csv.path(), &[ChartKind::Bar]).unwrap_err();
    assert!(matches!(
        err,
        ReportError::DataLoad(DataLoadError::DuplicateIndex { .. })
    ));
}

#[test]
fn test_degenerate_scatter_aborts_before_rendering() {
    let csv = create_temp_csv(
        "School ID,Instruction Score,College Enrollment Rate %\n1,50,10\n2,50,90\n3,NDA,40\n",
    );
    let out = tempfile::tempdir().unwrap();
    let report = ChartReport::new(ChartConfig::default(), out.path());
    let err = report.run(csv.path(), &[ChartKind::Scatter]).unwrap_err();
    assert!(matches!(err, ReportError::DegenerateFit(_)));
    assert!(!out.path().join("scatter_plot.png").exists());
}

#[test]
fn test_non_numeric_score_is_a_coercion_error() {
    let csv = create_temp_csv(
        "School ID,Network Manager,Environment Score,Safety Score\n1,A,10,20\n2,B,high,40\n",
    );
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    let table = report.load(csv.path(), &[ChartKind::Bar]).unwrap();
    let err = bar_chart_data(&table, &Cleaner::default()).unwrap_err();
    assert!(matches!(
        err,
        ReportError::TypeCoercion { ref row, ref value, .. } if row == "2" && value == "high"
    ));
}

#[test]
fn test_junk_in_a_dropped_row_is_not_coerced() {
    let csv = create_temp_csv(
        "School ID,Network Manager,Environment Score,Safety Score\n1,A,10,20\n2,A,n/a,NDA\n3,B,30,40\n",
    );
    let out = tempfile::tempdir().unwrap();
    let report = ChartReport::new(ChartConfig::default(), out.path());
    let table = report.load(csv.path(), &[ChartKind::Bar]).unwrap();
    let means = bar_chart_data(&table, &Cleaner::default()).unwrap();
    assert_eq!(means.groups, vec!["A", "B"]);
    assert_eq!(means.mean("A", ENVIRONMENT_SCORE), Some(10.0));
    assert_eq!(means.mean("B", SAFETY_SCORE), Some(40.0));

    let written = report.run(csv.path(), &[ChartKind::Bar]).unwrap();
    assert_eq!(written, vec![out.path().join("bar_chart.png")]);
}

#[test]
fn test_bad_scatter_value_does_not_block_other_charts() {
    let csv = create_temp_csv(
        "School ID,Network Manager,Environment Score,Safety Score,Instruction Score,College Enrollment Rate %\n\
         1,A,10,20,oops,30\n\
         2,B,30,40,50,60\n",
    );
    let report = ChartReport::new(ChartConfig::default(), Path::new("unused"));
    let table = report
        .load(csv.path(), &[ChartKind::Bar, ChartKind::Scatter])
        .unwrap();
    assert!(bar_chart_data(&table, &Cleaner::default()).is_ok());
    let config = ChartConfig::default();
    assert!(matches!(
        scatter_data(&table, &Cleaner::default(), &config.scatter),
        Err(ReportError::TypeCoercion { ref value, .. }) if value == "oops"
    ));
}

#[test]
fn test_full_run_writes_every_chart_and_summary() {
    let out = tempfile::tempdir().unwrap();
    let report =
        ChartReport::new(ChartConfig::default(), out.path()).with_summary_export(true);
    let written = report.run(&fixture(), &ChartKind::ALL).unwrap();
    assert_eq!(written.len(), 3);
    for kind in ChartKind::ALL {
        let stem = kind.file_stem();
        let image = out.path().join(format!("{stem}.png"));
        assert!(written.contains(&image));
        assert!(std::fs::metadata(&image).unwrap().len() > 0, "{stem}.png is empty");
        assert!(out.path().join(format!("{stem}_summary.csv")).exists());
    }

    let pies = std::fs::read_to_string(out.path().join("pie_charts_summary.csv")).unwrap();
    assert!(pies.starts_with("chart,category,count,percent"));
    assert!(pies.contains("Parent Engagement,Average,4,40"));
}
