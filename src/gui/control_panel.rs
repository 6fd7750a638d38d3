//! Control Panel Widget
//! Left side panel with data, record, chart and display controls.

use crate::charts::ChartKind;
use egui::{Color32, RichText};
use std::path::PathBuf;

const LOAD_COLOR: Color32 = Color32::from_rgb(0, 123, 255);
const RECORD_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const CHART_COLOR: Color32 = Color32::from_rgb(23, 162, 184);
const CLEAR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const BUTTON_SIZE: [f32; 2] = [220.0, 30.0];

/// Left side control panel. Everything but "Load Data" stays disabled until a load succeeds.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub row_count: usize,
    pub controls_enabled: bool,
    pub can_export: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            row_count: 0,
            controls_enabled: false,
            can_export: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every successful load.
    pub fn set_loaded(&mut self, path: PathBuf, row_count: usize) {
        self.csv_path = Some(path);
        self.row_count = row_count;
        self.controls_enabled = true;
    }

    fn action_button(
        ui: &mut egui::Ui,
        enabled: bool,
        text: &str,
        fill: Color32,
    ) -> bool {
        let button = egui::Button::new(RichText::new(text).size(14.0).strong().color(Color32::WHITE))
            .fill(fill)
            .min_size(egui::vec2(BUTTON_SIZE[0], BUTTON_SIZE[1]));
        ui.add_enabled(enabled, button).clicked()
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);
        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(5.0);
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚦 Accident Explorer")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Traffic accident data analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        // ===== Data Source =====
        Self::section(ui, "📁 Data Source");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .csv_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file loaded".to_string());
                ui.label(RichText::new(&path_text).size(12.0).color(
                    if self.csv_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    },
                ));
                if self.csv_path.is_some() {
                    ui.label(
                        RichText::new(format!("{} rows", self.row_count))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });
        ui.add_space(5.0);
        ui.vertical_centered(|ui| {
            if Self::action_button(ui, true, "Load Data", LOAD_COLOR) {
                action = ControlPanelAction::LoadData;
            }
        });

        // ===== Records =====
        Self::section(ui, "📝 Records");
        ui.vertical_centered(|ui| {
            if Self::action_button(ui, self.controls_enabled, "Add Record", RECORD_COLOR) {
                action = ControlPanelAction::AddRecord;
            }
            ui.add_space(4.0);
            if Self::action_button(ui, self.controls_enabled, "Search Person", RECORD_COLOR) {
                action = ControlPanelAction::SearchPerson;
            }
        });

        // ===== Charts =====
        Self::section(ui, "📊 Charts");
        ui.vertical_centered(|ui| {
            for kind in ChartKind::ALL {
                if Self::action_button(ui, self.controls_enabled, kind.button_label(), CHART_COLOR)
                {
                    action = ControlPanelAction::ShowChart(kind);
                }
                ui.add_space(4.0);
            }
            if Self::action_button(ui, self.controls_enabled, "Heat Map", CHART_COLOR) {
                action = ControlPanelAction::Heatmap;
            }
        });

        // ===== Display =====
        Self::section(ui, "🖼 Display");
        ui.vertical_centered(|ui| {
            if Self::action_button(
                ui,
                self.controls_enabled && self.can_export,
                "Save Chart as PNG",
                LOAD_COLOR,
            ) {
                action = ControlPanelAction::ExportPng;
            }
            ui.add_space(4.0);
            if Self::action_button(ui, self.controls_enabled, "Clear", CLEAR_COLOR) {
                action = ControlPanelAction::Clear;
            }
        });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    LoadData,
    AddRecord,
    SearchPerson,
    ShowChart(ChartKind),
    Heatmap,
    ExportPng,
    Clear,
}
