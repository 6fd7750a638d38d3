//! Chart Builder Module
//! Derives the summary behind each canned chart from the loaded table.

use crate::config::AppConfig;
use crate::data::{DataProcessor, Table, TableError};
use egui::Color32;
use tracing::{debug, info};

pub const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);
pub const SALMON: Color32 = Color32::from_rgb(250, 128, 114);
pub const LIGHT_GREEN: Color32 = Color32::from_rgb(144, 238, 144);
pub const PURPLE: Color32 = Color32::from_rgb(128, 0, 128);

/// Slice colours, cycled when there are more slices.
pub const PIE_PALETTE: [Color32; 3] = [
    Color32::from_rgb(173, 216, 230), // light blue
    Color32::from_rgb(240, 128, 128), // light coral
    LIGHT_GREEN,
];

/// The five table-backed charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    AccidentClass,
    Severity,
    TemporalTrend,
    AgeDistribution,
    SexDistribution,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::AccidentClass,
        ChartKind::Severity,
        ChartKind::TemporalTrend,
        ChartKind::AgeDistribution,
        ChartKind::SexDistribution,
    ];

    pub fn button_label(self) -> &'static str {
        match self {
            ChartKind::AccidentClass => "Accident Class Chart",
            ChartKind::Severity => "Severity Chart",
            ChartKind::TemporalTrend => "Temporal Trends",
            ChartKind::AgeDistribution => "Age Distribution",
            ChartKind::SexDistribution => "Sex Distribution",
        }
    }

    /// Source column name under the given configuration.
    pub fn column(self, config: &AppConfig) -> &str {
        let columns = &config.columns;
        match self {
            ChartKind::AccidentClass => &columns.accident_class,
            ChartKind::Severity => &columns.severity,
            ChartKind::TemporalTrend => &columns.date,
            ChartKind::AgeDistribution => &columns.age,
            ChartKind::SexDistribution => &columns.sex,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    pub percent: f64,
    pub color: Color32,
}

impl PieSlice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// One bar per category, drawn in the given order.
    Bars {
        categories: Vec<String>,
        counts: Vec<u64>,
        rotate_labels: bool,
    },
    /// Fixed-width bins with a tick at every edge.
    Histogram { edges: Vec<f64>, counts: Vec<u64> },
    Pie { slices: Vec<PieSlice> },
}

/// Everything needed to draw one chart, interactively or to a PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: Color32,
    pub body: ChartBody,
}

impl ChartData {
    /// `(label, count)` pairs regardless of chart shape.
    pub fn counts(&self) -> Vec<(String, u64)> {
        match &self.body {
            ChartBody::Bars {
                categories, counts, ..
            } => categories.iter().cloned().zip(counts.iter().copied()).collect(),
            ChartBody::Histogram { edges, counts } => edges
                .windows(2)
                .zip(counts)
                .map(|(w, c)| (format!("{}-{}", w[0], w[1]), *c))
                .collect(),
            ChartBody::Pie { slices } => slices
                .iter()
                .map(|s| (s.label.clone(), s.count))
                .collect(),
        }
    }
}

pub struct ChartBuilder;

impl ChartBuilder {
    /// Build `kind` from `table`. A missing source column is `ColumnNotFound`.
    pub fn build(
        kind: ChartKind,
        table: &Table,
        config: &AppConfig,
    ) -> Result<ChartData, TableError> {
        let column = kind.column(config);
        let values = table.text_values(column)?;

        let chart = match kind {
            ChartKind::AccidentClass => Self::frequency_bars(
                kind,
                &values,
                "Accident Class Frequency",
                "Accident Class",
                SKY_BLUE,
            ),
            ChartKind::Severity => Self::frequency_bars(
                kind,
                &values,
                "Accident Severity Frequency",
                "Severity",
                SALMON,
            ),
            ChartKind::TemporalTrend => {
                let (categories, counts) =
                    DataProcessor::monthly_counts(&values).into_iter().unzip();
                ChartData {
                    kind,
                    title: "Accident Trends Over Time".to_string(),
                    x_label: "Date".to_string(),
                    y_label: "Number of Accidents".to_string(),
                    color: LIGHT_GREEN,
                    body: ChartBody::Bars {
                        categories,
                        counts,
                        rotate_labels: true,
                    },
                }
            }
            ChartKind::AgeDistribution => {
                let bins = &config.age_histogram;
                let ages = DataProcessor::to_numeric(&values);
                let hist = DataProcessor::histogram(&ages, bins.start, bins.end, bins.bin_width);
                debug!(binned = hist.total(), values = values.len(), "ages binned");
                ChartData {
                    kind,
                    title: "Age Distribution of Involved People".to_string(),
                    x_label: "Age".to_string(),
                    y_label: "Count".to_string(),
                    color: PURPLE,
                    body: ChartBody::Histogram {
                        edges: hist.edges,
                        counts: hist.counts,
                    },
                }
            }
            ChartKind::SexDistribution => {
                let counts = DataProcessor::value_counts(&values);
                let percents = DataProcessor::percentages(&counts);
                let slices = counts
                    .into_iter()
                    .zip(percents)
                    .enumerate()
                    .map(|(i, ((label, count), percent))| PieSlice {
                        label,
                        count,
                        percent,
                        color: PIE_PALETTE[i % PIE_PALETTE.len()],
                    })
                    .collect();
                ChartData {
                    kind,
                    title: "Sex Distribution of Involved People".to_string(),
                    x_label: String::new(),
                    y_label: String::new(),
                    color: PIE_PALETTE[0],
                    body: ChartBody::Pie { slices },
                }
            }
        };

        info!(kind = ?kind, column, groups = chart.counts().len(), "chart built");
        Ok(chart)
    }

    fn frequency_bars(
        kind: ChartKind,
        values: &[Option<String>],
        title: &str,
        x_label: &str,
        color: Color32,
    ) -> ChartData {
        let (categories, counts) = DataProcessor::value_counts(values).into_iter().unzip();
        ChartData {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: "Count".to_string(),
            color,
            body: ChartBody::Bars {
                categories,
                counts,
                rotate_labels: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn table(body: &str) -> (tempfile::TempDir, Table) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accidents.csv");
        fs::write(&path, body).unwrap();
        let table = Table::load_csv(&path, b';').unwrap();
        (dir, table)
    }

    #[test]
    fn accident_class_counts_by_frequency() {
        let (_dir, t) = table("CLASE DE SINIESTRO;GRAVEDAD\nX;LEVE\nY;LEVE\nX;GRAVE\n");
        let chart = ChartBuilder::build(ChartKind::AccidentClass, &t, &AppConfig::default())
            .unwrap();

        assert_eq!(chart.counts(), vec![("X".to_string(), 2), ("Y".to_string(), 1)]);
        assert!(matches!(
            chart.body,
            ChartBody::Bars {
                rotate_labels: true,
                ..
            }
        ));
        assert_eq!(chart.color, SKY_BLUE);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let (_dir, t) = table("A;B\n1;2\n");
        let err = ChartBuilder::build(ChartKind::Severity, &t, &AppConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Column 'GRAVEDAD' not found.");
    }

    #[test]
    fn age_histogram_uses_configured_bins() {
        let (_dir, t) = table("EDAD\n5\n15\n999\nabc\n");
        let chart = ChartBuilder::build(ChartKind::AgeDistribution, &t, &AppConfig::default())
            .unwrap();

        let ChartBody::Histogram { edges, counts } = &chart.body else {
            panic!("expected histogram");
        };
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&100.0));
        assert_eq!(counts.iter().sum::<u64>(), 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[3], 1);
    }

    #[test]
    fn sex_pie_has_one_decimal_percentages() {
        let (_dir, t) = table("SEXO\nF\nM\nM\n");
        let chart = ChartBuilder::build(ChartKind::SexDistribution, &t, &AppConfig::default())
            .unwrap();

        let ChartBody::Pie { slices } = &chart.body else {
            panic!("expected pie");
        };
        let labels: Vec<String> = slices.iter().map(PieSlice::percent_label).collect();
        assert_eq!(labels, vec!["66.7%".to_string(), "33.3%".to_string()]);
        assert_eq!(slices[0].label, "M");
        assert_eq!(slices[1].color, PIE_PALETTE[1]);
    }

    #[test]
    fn temporal_trend_buckets_by_month() {
        let (_dir, t) = table("FECHA\n2022-05-01\n2022-04-30\nbad\n2022-05-17\n");
        let chart = ChartBuilder::build(ChartKind::TemporalTrend, &t, &AppConfig::default())
            .unwrap();
        assert_eq!(
            chart.counts(),
            vec![("2022-04".to_string(), 1), ("2022-05".to_string(), 2)]
        );
    }
}
