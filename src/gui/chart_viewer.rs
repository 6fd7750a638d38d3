//! Chart Viewer Widget
//! Central area showing the single displayed chart, or a placeholder.

use crate::charts::{ChartData, ChartPlotter};
use egui::{Color32, RichText};

pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, chart: Option<&ChartData>) {
        match chart {
            Some(chart) => ChartPlotter::draw(ui, chart),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No chart").size(20.0).color(Color32::GRAY));
                });
            }
        }
    }
}
