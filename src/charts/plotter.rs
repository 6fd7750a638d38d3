//! Chart Plotter Module
//! Draws bar charts, histograms and pie charts inside egui.

use crate::charts::{ChartBody, ChartData, PieSlice};
use egui::epaint::TextShape;
use egui::{pos2, vec2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotPoint, PlotTransform};
use std::f32::consts::{FRAC_PI_4, TAU};

const BAR_WIDTH: f64 = 0.8;
const LABEL_FONT_SIZE: f32 = 11.0;
const MAX_LABEL_BAND: f32 = 160.0;
const PIE_SEGMENT_STEP: f32 = 0.05;

/// Draws a [`ChartData`] filling the available space.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn draw(ui: &mut egui::Ui, chart: &ChartData) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&chart.title).size(18.0).strong());
        });
        ui.add_space(6.0);

        match &chart.body {
            ChartBody::Bars {
                categories,
                counts,
                rotate_labels,
            } => Self::draw_bars(ui, chart, categories, counts, *rotate_labels),
            ChartBody::Histogram { edges, counts } => Self::draw_histogram(ui, chart, edges, counts),
            ChartBody::Pie { slices } => Self::draw_pie(ui, slices),
        }
    }

    /// Height reserved under the plot for labels rotated 45°.
    fn label_band_height(ui: &egui::Ui, categories: &[String]) -> f32 {
        let widest = categories
            .iter()
            .map(|c| {
                ui.painter()
                    .layout_no_wrap(c.clone(), FontId::proportional(LABEL_FONT_SIZE), Color32::GRAY)
                    .size()
                    .x
            })
            .fold(0.0f32, f32::max);
        (widest * FRAC_PI_4.sin() + 16.0).min(MAX_LABEL_BAND)
    }

    fn draw_bars(
        ui: &mut egui::Ui,
        chart: &ChartData,
        categories: &[String],
        counts: &[u64],
        rotate_labels: bool,
    ) {
        let band = if rotate_labels {
            Self::label_band_height(ui, categories)
        } else {
            0.0
        };
        let height = (ui.available_height() - band).max(120.0);

        let bars: Vec<Bar> = categories
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(i, (name, &count))| {
                Bar::new(i as f64, count as f64)
                    .width(BAR_WIDTH)
                    .name(name)
                    .fill(chart.color)
                    .stroke(Stroke::new(1.0, chart.color.gamma_multiply(0.8)))
            })
            .collect();

        let labels = categories.to_vec();
        let response = Plot::new(format!("bars_{:?}", chart.kind))
            .height(height)
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .include_y(0.0)
            .allow_scroll(false)
            .x_grid_spacer(move |_input| {
                (0..labels.len())
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                if rotate_labels {
                    String::new()
                } else {
                    format!("{}", mark.value)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(chart.color).name(&chart.title));
            });

        if rotate_labels {
            let (band_rect, _) =
                ui.allocate_exact_size(vec2(ui.available_width(), band), Sense::hover());
            Self::draw_rotated_labels(ui, &response.transform, band_rect.top(), categories);
        }
    }

    /// Category labels rotated 45° counter-clockwise, each ending under its bar.
    fn draw_rotated_labels(
        ui: &egui::Ui,
        transform: &PlotTransform,
        top: f32,
        categories: &[String],
    ) {
        let frame = *transform.frame();
        let color = ui.visuals().text_color();
        let (sin, cos) = FRAC_PI_4.sin_cos();

        for (i, label) in categories.iter().enumerate() {
            let tick = transform.position_from_point(&PlotPoint::new(i as f64, 0.0));
            if tick.x < frame.left() || tick.x > frame.right() {
                continue;
            }

            let galley = ui.painter().layout_no_wrap(
                label.clone(),
                FontId::proportional(LABEL_FONT_SIZE),
                color,
            );
            let w = galley.size().x;
            let anchor = pos2(tick.x - w * cos, top + 6.0 + w * sin);
            ui.painter()
                .add(TextShape::new(anchor, galley, color).with_angle(-FRAC_PI_4));
        }
    }

    fn draw_histogram(ui: &mut egui::Ui, chart: &ChartData, edges: &[f64], counts: &[u64]) {
        let bars: Vec<Bar> = edges
            .windows(2)
            .zip(counts)
            .map(|(w, &count)| {
                Bar::new((w[0] + w[1]) / 2.0, count as f64)
                    .width(w[1] - w[0])
                    .name(format!("{}-{}", w[0], w[1]))
                    .fill(chart.color)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        let ticks = edges.to_vec();
        let step = edges
            .windows(2)
            .next()
            .map(|w| w[1] - w[0])
            .unwrap_or(1.0);

        Plot::new(format!("hist_{:?}", chart.kind))
            .height(ui.available_height().max(120.0))
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .include_y(0.0)
            .allow_scroll(false)
            .x_grid_spacer(move |_input| {
                ticks
                    .iter()
                    .map(|&value| GridMark {
                        value,
                        step_size: step,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(chart.color).name(&chart.title));
            });
    }

    fn draw_pie(ui: &mut egui::Ui, slices: &[PieSlice]) {
        let side = ui.available_width().min(ui.available_height()).max(120.0);
        let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), side), Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter();
        let center = rect.center();
        let radius = side * 0.38;
        let text_color = ui.visuals().text_color();
        let total: u64 = slices.iter().map(|s| s.count).sum();
        if total == 0 {
            return;
        }

        // Angles run counter-clockwise from 3 o'clock.
        let mut start = 0.0f32;
        for slice in slices {
            let sweep = TAU * slice.count as f32 / total as f32;
            let end = start + sweep;

            let steps = ((sweep / PIE_SEGMENT_STEP).ceil() as usize).max(1);
            for k in 0..steps {
                let a0 = start + sweep * k as f32 / steps as f32;
                let a1 = start + sweep * (k + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![
                        center,
                        Self::polar(center, radius, a0),
                        Self::polar(center, radius, a1),
                    ],
                    slice.color,
                    Stroke::NONE,
                ));
            }

            let mid = start + sweep / 2.0;
            painter.text(
                Self::polar(center, radius * 0.6, mid),
                egui::Align2::CENTER_CENTER,
                slice.percent_label(),
                FontId::proportional(13.0),
                Color32::BLACK,
            );
            painter.text(
                Self::polar(center, radius * 1.12, mid),
                Self::outer_align(mid),
                &slice.label,
                FontId::proportional(14.0),
                text_color,
            );

            start = end;
        }
    }

    fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
        pos2(center.x + radius * angle.cos(), center.y - radius * angle.sin())
    }

    fn outer_align(angle: f32) -> egui::Align2 {
        if angle.cos() >= 0.0 {
            egui::Align2::LEFT_CENTER
        } else {
            egui::Align2::RIGHT_CENTER
        }
    }
}
