//! Heat Map Renderer
//! Writes a standalone Leaflet heat map of the built-in reference cities and
//! opens it with the system default handler.

use crate::config::HeatmapConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Failed to write heat map: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode heat map points: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to open heat map: {0}")]
    Open(std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

const fn point(name: &'static str, latitude: f64, longitude: f64) -> ReferencePoint {
    ReferencePoint {
        name,
        latitude,
        longitude,
    }
}

pub const REFERENCE_POINTS: [ReferencePoint; 20] = [
    point("Lima", -12.04318, -77.02824),
    point("Callao", -12.05659, -77.11814),
    point("Arequipa", -16.39889, -71.535),
    point("Trujillo", -8.11599, -79.02998),
    point("Chiclayo", -6.77137, -79.84088),
    point("Piura", -5.19449, -80.63282),
    point("Huancayo", -12.06513, -75.20486),
    point("Iquitos", -3.74912, -73.25383),
    point("Pucallpa", -8.37915, -74.55387),
    point("Chimbote", -9.07508, -78.59373),
    point("Tacna", -18.01465, -70.25362),
    point("Ica", -14.06777, -75.72861),
    point("Juliaca", -15.5, -70.13333),
    point("Cusco", -13.52264, -71.96734),
    point("Cajamarca", -7.16378, -78.50027),
    point("Huánuco", -9.93062, -76.24223),
    point("Sullana", -4.90389, -80.68528),
    point("Ayacucho", -13.15878, -74.22321),
    point("Puno", -15.8422, -70.0199),
    point("Puerto Maldonado", -12.59331, -69.18913),
];

pub struct HeatmapRenderer;

impl HeatmapRenderer {
    /// Render the HTML document for `points`.
    pub fn render_html(
        config: &HeatmapConfig,
        points: &[ReferencePoint],
    ) -> Result<String, HeatmapError> {
        let heat: Vec<[f64; 2]> = points.iter().map(|p| [p.latitude, p.longitude]).collect();
        let heat_json = serde_json::to_string(&heat)?;
        let names: Vec<&str> = points.iter().map(|p| p.name).collect();
        let names_json = serde_json::to_string(&names)?;
        let [lat, lon] = config.center;

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Accident Heat Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; padding: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
    maxZoom: 18,
    attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
var heatData = {heat_json};
L.heatLayer(heatData, {{ radius: 25, blur: 15 }}).addTo(map);
var cityNames = {names_json};
heatData.forEach(function (p, i) {{
    L.circleMarker(p, {{ radius: 6, opacity: 0, fillOpacity: 0 }})
        .bindTooltip(cityNames[i])
        .addTo(map);
}});
</script>
</body>
</html>
"#,
            lat = lat,
            lon = lon,
            zoom = config.zoom,
            heat_json = heat_json,
            names_json = names_json,
        ))
    }

    /// Write the built-in reference map into `dir`; returns the file path.
    pub fn write(config: &HeatmapConfig, dir: &Path) -> Result<PathBuf, HeatmapError> {
        let html = Self::render_html(config, &REFERENCE_POINTS)?;
        let path = dir.join(&config.file_name);
        fs::write(&path, html)?;
        info!(path = %path.display(), points = REFERENCE_POINTS.len(), "heat map written");
        Ok(path)
    }

    /// Write into the working directory and open in the default viewer.
    pub fn write_and_open(config: &HeatmapConfig) -> Result<PathBuf, HeatmapError> {
        let path = Self::write(config, Path::new("."))?;
        open::that(&path).map_err(HeatmapError::Open)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_has_twenty_cities() {
        assert_eq!(REFERENCE_POINTS.len(), 20);
        assert_eq!(REFERENCE_POINTS[0].name, "Lima");
        assert_eq!(REFERENCE_POINTS[19].name, "Puerto Maldonado");
    }

    #[test]
    fn document_centres_map_and_lists_every_point() {
        let html = HeatmapRenderer::render_html(&HeatmapConfig::default(), &REFERENCE_POINTS)
            .unwrap();

        assert!(html.contains("setView([-9.19, -75.0152], 6)"));
        assert!(html.contains("L.heatLayer"));
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        for p in &REFERENCE_POINTS {
            assert!(html.contains(&format!("[{},{}]", p.latitude, p.longitude)));
            assert!(html.contains(&format!("\"{}\"", p.name)));
        }
        assert!(html.contains(".bindTooltip(cityNames[i])"));
    }

    #[test]
    fn write_uses_configured_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = HeatmapConfig {
            file_name: "map.html".to_string(),
            ..HeatmapConfig::default()
        };

        let path = HeatmapRenderer::write(&config, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("map.html"));
        let html = fs::read_to_string(path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
