//! Charts module - Chart building and rendering

mod builder;
mod heatmap;
mod plotter;
mod renderer;

pub use builder::{ChartBody, ChartBuilder, ChartData, ChartKind, PieSlice};
pub use heatmap::{HeatmapError, HeatmapRenderer};
pub use plotter::ChartPlotter;
pub use renderer::{ExportError, StaticChartRenderer, EXPORT_SIZE};
