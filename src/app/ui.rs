use egui::{ComboBox, Context, RichText, Slider, Ui};
use std::ops::RangeInclusive;

use crate::plotting::OverlayView;
use crate::utils::{format_time_tick, TimeWindow, MIN_WINDOW_SECONDS};

use super::App;

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.heading(&app.config.app.header);
    });

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Dataset");
        ui.separator();

        let dataset = &app.dataset;
        ui.label(format!("Source: {}", dataset.source().display()));
        ui.label(format!("Rows: {}", dataset.table().len()));
        ui.label(format!("Days: {}", dataset.partition().len()));
        if !dataset.table().dropped.is_empty() {
            ui.label(format!("Dropped lines: {}", dataset.table().dropped.len()));
        }

        ui.separator();
        for day in dataset.days() {
            ui.label(format!("{}: {} rows", day.key(), day.len()));
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Overview");
            ui.label(&app.config.app.overview);

            if let Some(message) = &app.error_message {
                ui.colored_label(egui::Color32::RED, message);
            }

            ui.separator();
            ui.heading("Overlaid daily quantity");
            ui.label(RichText::new(&app.config.chart.legend_title).italics());
            let view = overlay_controls(ui, app.overlay_view);
            app.set_overlay_view(view);
            if let Some(texture) = &app.overlay_texture {
                ui.image(texture);
            }

            ui.separator();
            ui.heading("Single day, picked with the date selector");
            if let Some(texture) = &app.day_texture {
                ui.image(texture);
            }

            ui.horizontal(|ui| {
                ui.label("Select date:");
                let keys = app.day_keys();
                let mut selected = app.selected_day.clone();
                ComboBox::new("day_selector", "")
                    .selected_text(&selected)
                    .show_ui(ui, |ui| {
                        for key in &keys {
                            ui.selectable_value(&mut selected, key.clone(), key);
                        }
                    });
                app.select_day(&selected);
                ui.label(format!("{} rows", app.selected_len()));
            });
        });
    });

    // Update plots if needed
    if app.update_needed {
        app.refresh_plots(ctx);
    }
}

/// Time window sliders and the marker toggle for the overlay chart.
fn overlay_controls(ui: &mut Ui, current: OverlayView) -> OverlayView {
    let mut start = current.window.start();
    let mut end = current.window.end();
    let mut markers = current.markers;
    let time_label = |secs: f64, _: RangeInclusive<usize>| format_time_tick(secs);

    ui.horizontal(|ui| {
        ui.label("From:");
        ui.add(
            Slider::new(&mut start, 0..=86_400 - MIN_WINDOW_SECONDS)
                .step_by(60.0)
                .custom_formatter(time_label),
        );
        ui.label("to:");
        ui.add(
            Slider::new(&mut end, MIN_WINDOW_SECONDS..=86_400)
                .step_by(60.0)
                .custom_formatter(time_label),
        );
        if ui.button("Whole day").clicked() {
            start = 0;
            end = 86_400;
        }
        ui.checkbox(&mut markers, "Markers");
    });

    OverlayView {
        window: TimeWindow::new(start, end),
        markers,
    }
}
