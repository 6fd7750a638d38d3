//! Accident Explorer Main Application
//! Main window with control panel, chart viewer, status line and dialogs.

use crate::config::AppConfig;
use crate::gui::record_form::{show_message, show_person_window, DialogResult};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, RecordForm, SearchPrompt};
use crate::session::{LookupOutcome, Session, SessionError};
use egui::{Color32, RichText, SidePanel, TopBottomPanel};
use tracing::{error, info, warn};

/// Message box queued for display.
struct Message {
    title: String,
    text: String,
}

/// Main application window.
pub struct AccidentApp {
    session: Session,
    control_panel: ControlPanel,

    // Open dialogs
    record_form: Option<RecordForm>,
    search_prompt: Option<SearchPrompt>,
    person_listing: Option<String>,
    message: Option<Message>,
}

impl AccidentApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            session: Session::new(config),
            control_panel: ControlPanel::new(),
            record_form: None,
            search_prompt: None,
            person_listing: None,
            message: None,
        }
    }

    fn show_info(&mut self, title: &str, text: impl Into<String>) {
        self.message = Some(Message {
            title: title.to_string(),
            text: text.into(),
        });
    }

    fn show_error(&mut self, err: &SessionError) {
        if err.is_missing_column() {
            warn!(error = %err, "column missing");
            self.show_info("Column Not Found", err.to_string());
        } else {
            error!(error = %err, "operation failed");
            self.show_info("Error", err.to_string());
        }
    }

    /// Handle CSV file selection
    fn handle_load_data(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_title("Select the CSV file")
            .pick_file()
        else {
            return;
        };

        match self.session.load_file(&path) {
            Ok(columns) => {
                if let Some(table) = self.session.table() {
                    let rows = table.row_count();
                    info!(columns = columns.len(), rows, "data loaded");
                    self.control_panel
                        .set_loaded(table.file_path().to_path_buf(), rows);
                }
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn handle_add_record(&mut self) {
        match self.session.record_draft() {
            Ok(draft) => {
                let age_column = self.session.config().columns.age.clone();
                self.record_form = Some(RecordForm::new(draft, age_column));
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn handle_search(&mut self, query: &str) {
        match self.session.search_person(query) {
            Ok(Some(LookupOutcome::Found(record))) => {
                self.person_listing = Some(record.listing());
            }
            // Status line already carries the message.
            Ok(Some(LookupOutcome::NoResults | LookupOutcome::ColumnMissing(_))) | Ok(None) => {}
            Err(e) => self.show_error(&e),
        }
    }

    fn handle_heatmap(&mut self) {
        if let Err(e) = self.session.open_heatmap() {
            self.show_error(&e);
        }
    }

    fn handle_export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("chart.png")
            .save_file()
        else {
            return;
        };

        match self.session.export_chart(&path) {
            Ok(()) => self.show_info("Export", format!("Chart saved to {}", path.display())),
            Err(e) => self.show_error(&e),
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::LoadData => self.handle_load_data(),
            ControlPanelAction::AddRecord => self.handle_add_record(),
            ControlPanelAction::SearchPerson => {
                self.search_prompt = Some(SearchPrompt::default());
            }
            ControlPanelAction::ShowChart(kind) => {
                if let Err(e) = self.session.show_chart(kind) {
                    self.show_error(&e);
                }
            }
            ControlPanelAction::Heatmap => self.handle_heatmap(),
            ControlPanelAction::ExportPng => self.handle_export_png(),
            ControlPanelAction::Clear => self.session.clear(),
            ControlPanelAction::None => {}
        }
    }

    /// Draw open dialogs and apply whatever they produced.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(form) = self.record_form.as_mut() {
            match form.show(ctx) {
                DialogResult::Submitted(draft) => {
                    self.record_form = None;
                    match self.session.add_record(draft) {
                        Ok(rows) => {
                            self.control_panel.row_count = rows;
                            self.show_info("Success", "Record added successfully.");
                        }
                        Err(e) => self.show_error(&e),
                    }
                }
                DialogResult::Cancelled => self.record_form = None,
                DialogResult::Pending => {}
            }
        }

        if let Some(prompt) = self.search_prompt.as_mut() {
            match prompt.show(ctx) {
                DialogResult::Submitted(query) => {
                    self.search_prompt = None;
                    self.handle_search(&query);
                }
                DialogResult::Cancelled => self.search_prompt = None,
                DialogResult::Pending => {}
            }
        }

        if let Some(listing) = &self.person_listing {
            if !show_person_window(ctx, listing) {
                self.person_listing = None;
            }
        }

        if let Some(message) = &self.message {
            if !show_message(ctx, &message.title, &message.text) {
                self.message = None;
            }
        }
    }
}

impl eframe::App for AccidentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.control_panel.can_export = !self.session.display().is_empty();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(250.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    self.handle_action(action);
                });
            });

        // Bottom panel - status line
        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(4.0);
            let status = self.session.status();
            let color = if status.starts_with("Data loaded") {
                Color32::from_rgb(40, 167, 69)
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(status).size(12.0).color(color));
            ui.add_space(4.0);
        });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(ui, self.session.display().current());
        });

        self.show_dialogs(ctx);
    }
}
