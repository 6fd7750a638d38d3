//! Accident Explorer - Traffic Accident CSV Analysis & Chart Viewer
//!
//! Loads a semicolon-separated accident dataset, lets the user add and look up
//! records, and draws a fixed set of charts plus a heat map of reference cities.

mod charts;
mod config;
mod data;
mod gui;
mod session;

use config::AppConfig;
use eframe::egui;
use gui::AccidentApp;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> eframe::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("{:#}; using default configuration", e);
        AppConfig::default()
    });
    info!(separator = %config.csv.separator, "startup");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Traffic Accident Data Analysis"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Accident Explorer",
        options,
        Box::new(|cc| Ok(Box::new(AccidentApp::new(cc, config)))),
    )
}
