//! Application Configuration Module
//! Column names, CSV dialect, map and histogram settings with an optional TOML override.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "accident_explorer.toml";

/// Names of the dataset columns each feature reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub accident_class: String,
    pub severity: String,
    pub date: String,
    pub age: String,
    pub sex: String,
    pub person_code: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            accident_class: "CLASE DE SINIESTRO".to_string(),
            severity: "GRAVEDAD".to_string(),
            date: "FECHA".to_string(),
            age: "EDAD".to_string(),
            sex: "SEXO".to_string(),
            person_code: "CÓDIGO PERSONA".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub separator: char,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { separator: ';' }
    }
}

impl CsvConfig {
    /// Separator as the single byte the CSV reader expects.
    pub fn separator_byte(&self) -> u8 {
        u8::try_from(self.separator).unwrap_or(b';')
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub file_name: String,
    /// Map centre as `[latitude, longitude]`.
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            file_name: "heatmap.html".to_string(),
            center: [-9.19, -75.0152],
            zoom: 6,
        }
    }
}

/// Fixed-width bins covering `[start, end]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub start: f64,
    pub end: f64,
    pub bin_width: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 100.0,
            bin_width: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnConfig,
    pub csv: CsvConfig,
    pub heatmap: HeatmapConfig,
    pub age_histogram: HistogramConfig,
    pub window: WindowConfig,
}

impl AppConfig {
    /// Load `accident_explorer.toml` from the working directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.csv.separator.is_ascii() {
            bail!("CSV separator must be an ASCII character");
        }
        let bins = &self.age_histogram;
        if bins.bin_width <= 0.0 || bins.end <= bins.start {
            bail!("Age histogram needs a positive bin width and end > start");
        }
        Ok(())
    }
}
