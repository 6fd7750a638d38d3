//! Dialog windows: new-record form, person search prompt, person details and errors.

use crate::data::RecordDraft;
use egui::{Align2, RichText, ScrollArea};

/// What the user did with a dialog this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult<T> {
    Pending,
    Submitted(T),
    Cancelled,
}

/// Form collecting one value per column plus the age.
pub struct RecordForm {
    draft: RecordDraft,
    age_column: String,
}

impl RecordForm {
    pub fn new(draft: RecordDraft, age_column: String) -> Self {
        Self { draft, age_column }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<RecordDraft> {
        let mut result = DialogResult::Pending;

        egui::Window::new("Add Record")
            .collapsible(false)
            .resizable(true)
            .default_size([420.0, 500.0])
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                    egui::Grid::new("record_form")
                        .num_columns(2)
                        .spacing([8.0, 6.0])
                        .striped(true)
                        .show(ui, |ui| {
                            for (column, value) in
                                self.draft.columns.iter().zip(self.draft.values.iter_mut())
                            {
                                ui.label(column);
                                if *column == self.age_column {
                                    ui.label(RichText::new("(from Age below)").italics());
                                } else {
                                    ui.text_edit_singleline(value);
                                }
                                ui.end_row();
                            }

                            ui.label(RichText::new("Age").strong());
                            ui.text_edit_singleline(&mut self.draft.age);
                            ui.end_row();
                        });
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        result = DialogResult::Submitted(self.draft.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        result = DialogResult::Cancelled;
                    }
                });
            });

        result
    }
}

/// Single-line prompt for a person code.
#[derive(Default)]
pub struct SearchPrompt {
    query: String,
}

impl SearchPrompt {
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<String> {
        let mut result = DialogResult::Pending;

        egui::Window::new("Search Person Data")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter the person code:");
                let response = ui.text_edit_singleline(&mut self.query);
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.horizontal(|ui| {
                    if ui.button("Search").clicked() || entered {
                        result = DialogResult::Submitted(self.query.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        result = DialogResult::Cancelled;
                    }
                });
            });

        result
    }
}

/// Read-only window with a record listing. Returns false once closed.
pub fn show_person_window(ctx: &egui::Context, listing: &str) -> bool {
    let mut open = true;
    egui::Window::new("Person Data")
        .open(&mut open)
        .default_size([400.0, 400.0])
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.label(RichText::new(listing).size(14.0));
            });
        });
    open
}

/// Modal-style message box. Returns false once dismissed.
pub fn show_message(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut keep = true;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                keep = false;
            }
        });
    keep
}
