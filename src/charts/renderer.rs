//! Static Chart Renderer
//! Renders the displayed chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Title centred on top
//! 2. Bars / histogram with axis descriptions, or a pie with one label per slice

use crate::charts::{ChartBody, ChartData, PieSlice};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Drawing(e.to_string())
}

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

pub const EXPORT_SIZE: (u32, u32) = (1000, 600);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Save `chart` as a PNG of `size` pixels at `path`.
    pub fn save_png(chart: &ChartData, path: &Path, size: (u32, u32)) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        match &chart.body {
            ChartBody::Bars {
                categories, counts, ..
            } => Self::draw_bars(&root, chart, categories, counts)?,
            ChartBody::Histogram { edges, counts } => {
                Self::draw_histogram(&root, chart, edges, counts)?
            }
            ChartBody::Pie { slices } => Self::draw_pie(&root, chart, slices)?,
        }

        root.present().map_err(drawing_error)?;
        info!(path = %path.display(), kind = ?chart.kind, "chart exported");
        Ok(())
    }

    fn y_top(counts: &[u64]) -> u64 {
        let max = counts.iter().copied().max().unwrap_or(0);
        (max + max / 10).max(1)
    }

    fn draw_bars(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        chart: &ChartData,
        categories: &[String],
        counts: &[u64],
    ) -> Result<(), ExportError> {
        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d((0..categories.len().max(1)).into_segmented(), 0u64..Self::y_top(counts))
            .map_err(drawing_error)?;

        let label_of = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => categories.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len().max(1))
            .x_label_formatter(&label_of)
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(rgb(chart.color).filled())
                .margin(8)
                .data(counts.iter().enumerate().map(|(i, &c)| (i, c))),
        )
        .map_err(drawing_error)?;

        Ok(())
    }

    fn draw_histogram(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        chart: &ChartData,
        edges: &[f64],
        counts: &[u64],
    ) -> Result<(), ExportError> {
        let (start, end) = match (edges.first(), edges.last()) {
            (Some(&s), Some(&e)) => (s, e),
            _ => (0.0, 1.0),
        };

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(start..end, 0u64..Self::y_top(counts))
            .map_err(drawing_error)?;

        ctx.configure_mesh()
            .x_labels(edges.len())
            .x_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        let fill = rgb(chart.color);
        ctx.draw_series(edges.windows(2).zip(counts).map(|(w, &c)| {
            let mut bar = Rectangle::new([(w[0], 0u64), (w[1], c)], fill.filled());
            bar.set_margin(0, 0, 1, 1);
            bar
        }))
        .map_err(drawing_error)?;

        Ok(())
    }

    fn draw_pie(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        chart: &ChartData,
        slices: &[PieSlice],
    ) -> Result<(), ExportError> {
        let area = root
            .titled(&chart.title, ("sans-serif", 26))
            .map_err(drawing_error)?;
        if slices.is_empty() {
            return Ok(());
        }

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.38;
        let sizes: Vec<f64> = slices.iter().map(|s| s.count as f64).collect();
        let colors: Vec<RGBColor> = slices.iter().map(|s| rgb(s.color)).collect();
        let labels: Vec<String> = slices
            .iter()
            .map(|s| format!("{} ({})", s.label, s.percent_label()))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(0.0);
        pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
        area.draw(&pie).map_err(drawing_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_axis_leaves_headroom_above_tallest_bar() {
        assert_eq!(StaticChartRenderer::y_top(&[3, 40, 12]), 44);
        assert_eq!(StaticChartRenderer::y_top(&[]), 1);
        assert_eq!(StaticChartRenderer::y_top(&[0, 0]), 1);
    }
}
