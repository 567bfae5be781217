use eframe::App as EApp;
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::analysis::Dataset;
use crate::config::Config;
use crate::plotting::{
    render_day_rgb, render_overlay_rgb, OverlayView, Palette, PlotCache, PlotCacheKey,
};

/// Main application state
pub struct App {
    pub dataset: Arc<Dataset>,
    pub config: Config,
    pub palette: Palette,
    /// Key of the day shown in the single-day chart
    pub selected_day: String,
    /// Zoom window and marker toggle of the overlay chart
    pub overlay_view: OverlayView,
    pub overlay_texture: Option<TextureHandle>,
    pub day_texture: Option<TextureHandle>,
    pub update_needed: bool,
    pub error_message: Option<String>,
    plot_cache: PlotCache,
}

impl App {
    pub fn new(dataset: Arc<Dataset>, config: Config) -> Self {
        let preferred = config.app.default_day.as_deref();
        let selected_day = dataset
            .default_day(preferred)
            .map(str::to_string)
            .unwrap_or_default();
        if selected_day.is_empty() {
            warn!("dataset has no days to select");
        }

        let palette = Palette::from_config(&config.chart, dataset.partition().len());
        let plot_cache = PlotCache::new(config.app.plot_cache_size);

        Self {
            dataset,
            config,
            palette,
            selected_day,
            overlay_view: OverlayView::default(),
            overlay_texture: None,
            day_texture: None,
            update_needed: true,
            error_message: None,
            plot_cache,
        }
    }

    /// Keys offered by the date selector.
    pub fn day_keys(&self) -> Vec<String> {
        self.dataset.day_keys().map(str::to_string).collect()
    }

    /// Switch the single-day chart to `key`. Returns whether the selection changed.
    ///
    /// Unknown keys are accepted and render the empty "no data" chart.
    pub fn select_day(&mut self, key: &str) -> bool {
        if self.selected_day == key {
            return false;
        }
        if !self.dataset.partition().contains(key) {
            warn!(day = key, "selected day has no records");
        }
        self.selected_day = key.to_string();
        self.update_needed = true;
        true
    }

    /// Zoom or restyle the overlay chart. Returns whether anything changed.
    pub fn set_overlay_view(&mut self, view: OverlayView) -> bool {
        if self.overlay_view == view {
            return false;
        }
        debug!(
            start = view.window.start(),
            end = view.window.end(),
            markers = view.markers,
            "overlay view changed"
        );
        self.overlay_view = view;
        self.overlay_texture = None;
        self.update_needed = true;
        true
    }

    /// Number of rows behind the current selection.
    pub fn selected_len(&self) -> usize {
        self.dataset
            .select(&self.selected_day)
            .map(|day| day.len())
            .unwrap_or(0)
    }

    fn chart_size(&self) -> [usize; 2] {
        [
            self.config.chart.width as usize,
            self.config.chart.height as usize,
        ]
    }

    /// Render (or fetch from the cache) whatever the UI is about to show.
    pub fn refresh_plots(&mut self, ctx: &Context) {
        let (width, height) = (self.config.chart.width, self.config.chart.height);
        let size = self.chart_size();
        self.error_message = None;

        if self.overlay_texture.is_none() {
            let dataset = Arc::clone(&self.dataset);
            let chart = self.config.chart.clone();
            let palette = self.palette.clone();
            let view = self.overlay_view;
            match self
                .plot_cache
                .get_or_render(PlotCacheKey::overlay(view, width, height), || {
                    render_overlay_rgb(&dataset, &chart, &palette, &view)
                }) {
                Ok(pixels) => {
                    self.overlay_texture = Some(load_texture(ctx, "overlay_plot", size, &pixels));
                }
                Err(e) => {
                    error!("Plotting error: {}", e);
                    self.error_message = Some(format!("Could not draw the overview: {e}"));
                }
            }
        }

        let dataset = Arc::clone(&self.dataset);
        let chart = self.config.chart.clone();
        let day = self.selected_day.clone();
        match self
            .plot_cache
            .get_or_render(PlotCacheKey::day(&day, width, height), || {
                render_day_rgb(&dataset, &day, &chart)
            }) {
            Ok(pixels) => {
                debug!(day = %day, "showing day chart");
                self.day_texture = Some(load_texture(ctx, "day_plot", size, &pixels));
            }
            Err(e) => {
                error!("Plotting error: {}", e);
                self.error_message = Some(format!("Could not draw {day}: {e}"));
            }
        }

        self.update_needed = false;
    }
}

fn load_texture(ctx: &Context, name: &str, size: [usize; 2], pixels: &[u8]) -> TextureHandle {
    ctx.load_texture(name, ColorImage::from_rgb(size, pixels), TextureOptions::LINEAR)
}

impl EApp for App {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        super::ui::draw_ui(self, ctx);
    }
}

/// Open the dashboard window and block until it is closed.
pub fn run(config: Config, dataset: Arc<Dataset>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(config.app.window_title.clone()),
        ..Default::default()
    };
    let title = config.app.window_title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(egui::FontDefinitions::default());
            Ok(Box::new(App::new(dataset, config)) as Box<dyn EApp>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("error running dashboard: {e}"))
}
