//! Static Chart Renderer
//! Draws the three report-card charts to PNG files with plotters.
//!
//! Layouts:
//! 1. Bar: one bar per value series per group, side by side, legend top right
//! 2. Pies: grid of titled pies, slice labels carry the rounded percentage
//! 3. Scatter: points plus the fitted regression line

use crate::charts::config::{BarChartStyle, PieGridStyle, ScatterStyle};
use crate::charts::palette;
use crate::error::{ReportError, Result};
use crate::stats::{FrequencyTable, GroupedMeans, LinearFit};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::TextStyle;
use std::fmt::Display;
use std::path::Path;

/// Pixels between the x axis and the top of a group label.
const GROUP_LABEL_GAP: i32 = 8;

/// Counts for one pie of the grid.
#[derive(Debug, Clone)]
pub struct PieChartData {
    pub title: String,
    pub palette: Vec<String>,
    pub counts: FrequencyTable,
}

/// Points and fitted line for the scatter plot.
#[derive(Debug, Clone)]
pub struct ScatterData {
    pub points: Vec<(f64, f64)>,
    pub fit: LinearFit,
}

fn render_err<E: Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Grouped bar chart of per-group means.
    pub fn render_bar(data: &GroupedMeans, style: &BarChartStyle, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        Self::draw_bar_chart(&root, data, style)?;
        info!(
            "Wrote bar chart ({} groups) to {}",
            data.groups.len(),
            path.display()
        );
        Ok(())
    }

    /// Draw the bar chart onto `root`. Returns the anchor of each group label.
    pub fn draw_bar_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &GroupedMeans,
        style: &BarChartStyle,
    ) -> Result<Vec<(i32, i32)>> {
        let colors = palette::resolve_palette(&style.colors)?;
        let n = data.groups.len();
        let w = style.bar_width;
        let n_series = data.series.len();

        root.fill(&WHITE).map_err(render_err)?;

        // Clusters are centred on integer x.
        let half = (w * n_series.max(1) as f64 / 2.0).max(0.5);

        let mut chart = ChartBuilder::on(root)
            .caption(&style.title, ("sans-serif", f64::from(style.title_font_size)))
            .margin(20)
            .x_label_area_size(style.height / 5)
            .y_label_area_size(60)
            .build_cartesian_2d(
                -half..(n.max(1) - 1) as f64 + half,
                style.y_min..style.y_max,
            )
            .map_err(render_err)?;

        // Group names are drawn below, the mesh only carries the y axis.
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_desc(&style.y_label)
            .draw()
            .map_err(render_err)?;

        for (s, series) in data.series.iter().enumerate() {
            let color = colors[s % colors.len()];
            let bars = series
                .means
                .iter()
                .enumerate()
                .filter(|(_, m)| !m.is_nan())
                .map(|(i, &mean)| {
                    let (x0, x1) = Self::bar_span(i, s, n_series, w);
                    Rectangle::new([(x0, 0.0), (x1, mean)], color.filled())
                })
                .collect::<Vec<_>>();
            chart
                .draw_series(bars)
                .map_err(render_err)?
                .label(series.value_column.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        let label_style = Self::group_label_style(style.label_font_size);
        let mut anchors = Vec::with_capacity(n);
        for (i, group) in data.groups.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(i as f64, style.y_min));
            let anchor = (x, y + GROUP_LABEL_GAP);
            root.draw_text(group, &label_style, anchor).map_err(render_err)?;
            anchors.push(anchor);
        }

        root.present().map_err(render_err)?;
        Ok(anchors)
    }

    /// Vertical text starting at its anchor and running down, centred on
    /// the anchor horizontally.
    fn group_label_style(font_size: u32) -> TextStyle<'static> {
        TextStyle::from(("sans-serif", f64::from(font_size)).into_font())
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Left, VPos::Center))
    }

    /// Grid of pie charts, one per panel, filled row by row.
    pub fn render_pies(panels: &[PieChartData], style: &PieGridStyle, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        Self::draw_pie_grid(&root, panels, style)?;
        info!("Wrote {} pie charts to {}", panels.len(), path.display());
        Ok(())
    }

    pub fn draw_pie_grid<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        panels: &[PieChartData],
        style: &PieGridStyle,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(render_err)?;

        let cells = root.split_evenly((style.rows, style.cols));
        for (cell, panel) in cells.iter().zip(panels) {
            let area = cell
                .titled(&panel.title, ("sans-serif", f64::from(style.title_font_size)))
                .map_err(render_err)?;
            if panel.counts.is_empty() {
                warn!("Pie '{}' has no data, leaving its cell blank", panel.title);
                continue;
            }

            let (center, radius) = Self::pie_geometry(&area);
            let colors = palette::resolve_palette(&panel.palette)?;
            let (sizes, colors, labels) = Self::pie_slices(&panel.counts, &colors);

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(Self::screen_start_angle(style.start_angle));
            pie.label_style(
                ("sans-serif", f64::from(style.label_font_size))
                    .into_font()
                    .color(&BLACK),
            );
            area.draw(&pie).map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Centre and radius of the pie filling `area`.
    ///
    /// `Pie` draws at its centre in backend pixels, not relative to the area
    /// it is drawn on, so the area's origin is added here.
    pub fn pie_geometry<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> ((i32, i32), f64) {
        let (bx, by) = area.get_base_pixel();
        let (pw, ph) = area.dim_in_pixel();
        let center = (bx + pw as i32 / 2, by + ph as i32 / 2);
        (center, pw.min(ph) as f64 * 0.32)
    }

    /// Scatter plot with the fitted line drawn over the observed x range.
    pub fn render_scatter(data: &ScatterData, style: &ScatterStyle, path: &Path) -> Result<()> {
        let point_color = palette::resolve(&style.point_color)?;
        let line_color = palette::resolve(&style.line_color)?;

        let xs: Vec<f64> = data.points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = data.points.iter().map(|p| p.1).collect();
        let (x_lo, x_hi) = Self::padded_range(&xs);
        let (y_lo, y_hi) = Self::padded_range(&ys);

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&style.title, ("sans-serif", f64::from(style.font_size)))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(&style.x_label)
            .y_desc(&style.y_label)
            .axis_desc_style(("sans-serif", f64::from(style.font_size)))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                data.points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), style.point_size, point_color.filled())),
            )
            .map_err(render_err)?;

        let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let fit = data.fit;
        chart
            .draw_series(LineSeries::new(
                [x_min, x_max].map(|x| (x, fit.predict(x))),
                line_color.stroke_width(2),
            ))
            .map_err(render_err)?
            .label(format!(
                "y = {:.3}x + {:.3} (r\u{b2} = {:.2})",
                fit.slope,
                fit.intercept,
                fit.r_squared()
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!(
            "Wrote scatter plot ({} points) to {}",
            data.points.len(),
            path.display()
        );
        Ok(())
    }

    /// Horizontal extent of bar `series` in group `group`; each cluster of
    /// `n_series` bars is centred on the group's integer position.
    pub fn bar_span(group: usize, series: usize, n_series: usize, width: f64) -> (f64, f64) {
        let x0 = group as f64 - width * n_series as f64 / 2.0 + series as f64 * width;
        (x0, x0 + width)
    }

    /// Slice sizes, colours and labels in drawing order.
    ///
    /// Plotters sweeps clockwise from the start angle. Reversing the slices
    /// gives the counter-clockwise layout, with the largest category first.
    pub fn pie_slices(
        counts: &FrequencyTable,
        base_colors: &[RGBColor],
    ) -> (Vec<f64>, Vec<RGBColor>, Vec<String>) {
        let n = counts.entries.len();
        let mut sizes: Vec<f64> = counts.counts().iter().map(|&c| c as f64).collect();
        let mut colors = palette::cycle(base_colors, n);
        let mut labels = Self::pie_labels(counts);
        sizes.reverse();
        colors.reverse();
        labels.reverse();
        (sizes, colors, labels)
    }

    /// "label (NN%)" for every slice.
    pub fn pie_labels(counts: &FrequencyTable) -> Vec<String> {
        counts
            .entries
            .iter()
            .zip(counts.percentages())
            .map(|(entry, pct)| format!("{} ({}%)", entry.label, pct))
            .collect()
    }

    /// Convert a counter-clockwise angle to plotters' clockwise screen angle.
    pub fn screen_start_angle(degrees_ccw: f64) -> f64 {
        (360.0 - degrees_ccw).rem_euclid(360.0)
    }

    /// Data range with 15% padding on each side.
    pub fn padded_range(values: &[f64]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if !v.is_nan() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min.is_infinite() {
            return (0.0, 100.0);
        }
        let pad = if max > min { (max - min) * 0.15 } else { 1.0 };
        ((min - pad).floor(), (max + pad).ceil())
    }
}
