mod cache;
mod chart;
pub mod styles;


pub use cache::{PlotCache, PlotCacheKey, PlotKind};
pub use chart::{
    day_layout, day_series, draw_day, draw_overlay, overlay_series, render_day_rgb,
    render_overlay_rgb, save_day, save_overlay, DayLayout, OverlayView, PlotError, SeriesSpec,
};
pub use styles::{ChartStyle, ChartTheme, Palette};
