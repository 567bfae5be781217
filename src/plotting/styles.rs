use plotters::style::{RGBAColor, RGBColor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ChartConfig, PaletteMode};

/// Dark salmon, light green and a magenta-ish purple.
pub const DAY_COLORS: [RGBColor; 3] = [
    RGBColor(220, 115, 69),
    RGBColor(74, 219, 154),
    RGBColor(217, 60, 225),
];

/// Color of the single-day scatter markers.
pub const SCATTER_COLOR: RGBColor = RGBColor(99, 110, 250);

/// Opacity of the lines joining a day's markers.
pub const LINE_OPACITY: f64 = 0.5;

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub plot_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            plot_color: RGBAColor(229, 236, 246, 1.0),
            text_color: RGBAColor(42, 63, 95, 1.0),
            grid_color: RGBAColor(255, 255, 255, 1.0),
            axis_color: RGBAColor(42, 63, 95, 0.8),
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub line_width: u32,
    pub marker_size: u32,
    pub font_size: f64,
    pub caption_size: f64,
    pub margin: u32,
    pub label_area_size: u32,
    /// Series longer than this are thinned before drawing
    pub max_points: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            marker_size: 4,
            font_size: 15.0,
            caption_size: 24.0,
            margin: 10,
            label_area_size: 60,
            max_points: 2_000,
        }
    }
}

impl ChartStyle {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            marker_size: config.marker_size,
            ..Self::default()
        }
    }
}

/// Colors handed out to day series by position.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Palette {
    pub fn fixed() -> Self {
        Self {
            colors: DAY_COLORS.to_vec(),
        }
    }

    /// `count` random opaque colors.
    pub fn random(count: usize, seed: Option<u64>) -> Self {
        if count == 0 {
            return Self::fixed();
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let colors = (0..count)
            .map(|_| RGBColor(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        Self { colors }
    }

    pub fn from_config(config: &ChartConfig, days: usize) -> Self {
        match config.palette {
            PaletteMode::Fixed => Self::fixed(),
            PaletteMode::Random => Self::random(days, config.palette_seed),
        }
    }

    /// Color of the `index`-th day; cycles when there are more days than colors.
    pub fn color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::fixed()
    }
}
