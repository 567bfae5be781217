use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use super::styles::{ChartStyle, ChartTheme, Palette, LINE_OPACITY, SCATTER_COLOR};
use crate::analysis::{Dataset, DaySlice};
use crate::config::ChartConfig;
use crate::utils::{
    downsample, format_quantity_tick, format_time_tick, quantity_range, time_range, TimeWindow,
};

pub type PlotError = Box<dyn Error + Send + Sync>;

/// One day's points, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSpec {
    pub label: String,
    pub color: RGBColor,
    /// `(seconds since midnight, quantity)` in time order
    pub points: Vec<(f64, f64)>,
}

pub fn day_series(day: &DaySlice<'_>, color: RGBColor) -> SeriesSpec {
    SeriesSpec {
        label: day.key().to_string(),
        color,
        points: day
            .rows()
            .map(|row| (f64::from(row.seconds_of_day()), row.quantity as f64))
            .collect(),
    }
}

/// One series per day, in partition order, colored by position.
pub fn overlay_series(dataset: &Dataset, palette: &Palette) -> Vec<SeriesSpec> {
    dataset
        .days()
        .enumerate()
        .map(|(i, day)| day_series(&day, palette.color(i)))
        .collect()
}

/// Which part of the day the overlay shows, and whether points get markers.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct OverlayView {
    pub window: TimeWindow,
    pub markers: bool,
}

impl Default for OverlayView {
    fn default() -> Self {
        Self {
            window: TimeWindow::FULL_DAY,
            markers: true,
        }
    }
}

impl OverlayView {
    /// Restrict every series to the points inside the window.
    pub fn clip(&self, series: Vec<SeriesSpec>) -> Vec<SeriesSpec> {
        series
            .into_iter()
            .map(|mut s| {
                s.points.retain(|&(x, _)| self.window.contains(x));
                s
            })
            .collect()
    }
}

/// Every day overlaid on a shared time-of-day axis, lines plus optional markers.
///
/// The x-axis spans `view.window`, the whole day unless zoomed.
pub fn draw_overlay<DB>(
    root: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    config: &ChartConfig,
    palette: &Palette,
    view: &OverlayView,
    theme: &ChartTheme,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = ChartStyle::from_config(config);
    root.fill(&theme.background_color)?;

    let series = view.clip(overlay_series(dataset, palette));
    let (x_min, x_max) = view.window.range();
    let values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .collect();
    let (y_min, y_max) = quantity_range(&values);

    let mut chart = ChartBuilder::on(root)
        .caption(
            &config.title,
            ("sans-serif", style.caption_size).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.plotting_area().fill(&theme.plot_color)?;

    let prefix = config.y_tick_prefix.clone();
    let y_label_formatter = move |y: &f64| format_quantity_tick(*y, &prefix);
    let x_label_formatter = |x: &f64| format_time_tick(*x);

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc(&config.x_title)
        .y_desc(&config.y_title)
        .x_labels(9)
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .label_style(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .draw()?;

    for s in &series {
        let points = downsample(&s.points, style.max_points);
        let line_color = s.color.mix(LINE_OPACITY);
        let marker_color = s.color;

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                line_color.stroke_width(style.line_width),
            ))?
            .label(&s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

        if view.markers {
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, style.marker_size, marker_color.filled())),
            )?;
        }
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(theme.background_color.mix(0.8))
            .border_style(theme.axis_color)
            .label_font(("sans-serif", style.font_size).into_font().color(&theme.text_color))
            .draw()?;

        root.draw(&Text::new(
            config.legend_title.clone(),
            (root.dim_in_pixel().0 as i32 - 220, 8),
            ("sans-serif", style.font_size).into_font().color(&theme.text_color),
        ))?;
    }

    Ok(())
}

/// What the single-day chart shows: caption, points and axis ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct DayLayout {
    pub caption: String,
    pub points: Vec<(f64, f64)>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// Lay out the chart for `key`. Without a day the chart is empty, spans the
/// whole day and is captioned "No data for <key>".
pub fn day_layout(key: &str, day: Option<&DaySlice<'_>>, y_title: &str, max_points: usize) -> DayLayout {
    let (caption, points) = match day {
        Some(day) => (
            format!("{y_title} on {key}"),
            downsample(&day_series(day, SCATTER_COLOR).points, max_points),
        ),
        None => (format!("No data for {key}"), Vec::new()),
    };

    let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    DayLayout {
        caption,
        x_range: time_range(&xs),
        y_range: quantity_range(&ys),
        points,
    }
}

/// Scatter chart of a single day; an unknown day renders an empty chart saying so.
pub fn draw_day<DB>(
    root: &DrawingArea<DB, Shift>,
    key: &str,
    day: Option<DaySlice<'_>>,
    config: &ChartConfig,
    theme: &ChartTheme,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = ChartStyle::from_config(config);
    root.fill(&theme.background_color)?;

    let layout = day_layout(key, day.as_ref(), &config.y_title, style.max_points);
    let (x_min, x_max) = layout.x_range;
    let (y_min, y_max) = layout.y_range;

    let mut chart = ChartBuilder::on(root)
        .caption(
            &layout.caption,
            ("sans-serif", style.caption_size).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.plotting_area().fill(&theme.plot_color)?;

    let prefix = config.y_tick_prefix.clone();
    let y_label_formatter = move |y: &f64| format_quantity_tick(*y, &prefix);
    let x_label_formatter = |x: &f64| format_time_tick(*x);

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("time")
        .y_desc(&config.y_title)
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .label_style(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .draw()?;

    chart.draw_series(
        layout
            .points
            .iter()
            .map(|&p| Circle::new(p, style.marker_size + 1, SCATTER_COLOR.filled())),
    )?;

    Ok(())
}

fn rgb_buffer(width: u32, height: u32) -> Vec<u8> {
    vec![0u8; width as usize * height as usize * 3]
}

/// Render the overlay chart into an RGB pixel buffer.
pub fn render_overlay_rgb(
    dataset: &Dataset,
    config: &ChartConfig,
    palette: &Palette,
    view: &OverlayView,
) -> Result<Vec<u8>, PlotError> {
    let mut buffer = rgb_buffer(config.width, config.height);
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (config.width, config.height)).into_drawing_area();
        draw_overlay(&root, dataset, config, palette, view, &ChartTheme::default())?;
        root.present()?;
    }
    Ok(buffer)
}

/// Render the chart of the day `key` into an RGB pixel buffer.
pub fn render_day_rgb(dataset: &Dataset, key: &str, config: &ChartConfig) -> Result<Vec<u8>, PlotError> {
    let mut buffer = rgb_buffer(config.width, config.height);
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (config.width, config.height)).into_drawing_area();
        draw_day(&root, key, dataset.select(key), config, &ChartTheme::default())?;
        root.present()?;
    }
    Ok(buffer)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

fn save_rgb(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), PlotError> {
    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or("pixel buffer does not match the chart size")?;
    image.save(path)?;
    Ok(())
}

/// Write the overlay chart; `.svg` paths get vector output, anything else an image file.
pub fn save_overlay(
    dataset: &Dataset,
    config: &ChartConfig,
    palette: &Palette,
    view: &OverlayView,
    path: &Path,
) -> Result<(), PlotError> {
    if is_svg(path) {
        let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_overlay(&root, dataset, config, palette, view, &ChartTheme::default())?;
        root.present()?;
        Ok(())
    } else {
        let pixels = render_overlay_rgb(dataset, config, palette, view)?;
        save_rgb(path, config.width, config.height, pixels)
    }
}

/// Write the chart of the day `key`, like [`save_overlay`].
pub fn save_day(dataset: &Dataset, key: &str, config: &ChartConfig, path: &Path) -> Result<(), PlotError> {
    if is_svg(path) {
        let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_day(&root, key, dataset.select(key), config, &ChartTheme::default())?;
        root.present()?;
        Ok(())
    } else {
        let pixels = render_day_rgb(dataset, key, config)?;
        save_rgb(path, config.width, config.height, pixels)
    }
}
