//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod record_form;

pub use app::AccidentApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use record_form::{RecordForm, SearchPrompt};
