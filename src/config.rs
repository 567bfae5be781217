//! # Configuration
//!
//! Settings are read from a TOML file. Every field has a default, so an empty
//! file (or no file at all) yields a working dashboard over the sample input.
//!
//! ```toml
//! [data]
//! input = "input_data/myRandomData.db"
//! on_invalid_datetime = "skip"
//! day_order = "ascending"
//!
//! [chart]
//! y_tick_prefix = "€"
//! palette = "random"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::{DayOrder, InvalidDateTimePolicy};
use crate::error::{DashError, Result};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub chart: ChartConfig,
    pub app: AppConfig,
}

/// Where the records come from and how they are interpreted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub input: PathBuf,
    pub datetime_field: String,
    pub quantity_field: String,
    pub on_invalid_datetime: InvalidDateTimePolicy,
    pub day_order: DayOrder,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input_data/myRandomData.db"),
            datetime_field: "some_date_field".to_string(),
            quantity_field: "some_qty_field".to_string(),
            on_invalid_datetime: InvalidDateTimePolicy::default(),
            day_order: DayOrder::default(),
        }
    }
}

/// How day series are colored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteMode {
    /// Three fixed colors, cycled
    #[default]
    Fixed,
    /// One random color per day
    Random,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub legend_title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_tick_prefix: String,
    pub width: u32,
    pub height: u32,
    pub marker_size: u32,
    pub palette: PaletteMode,
    /// Seed for the random palette; unseeded colors change on every start
    pub palette_seed: Option<u64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Your graph title here".to_string(),
            legend_title: "Your legend title here".to_string(),
            x_title: "Your x-axis title here".to_string(),
            y_title: "Your y-axis title here".to_string(),
            y_tick_prefix: "$".to_string(),
            width: 1200,
            height: 600,
            marker_size: 4,
            palette: PaletteMode::default(),
            palette_seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub header: String,
    pub overview: String,
    /// Day shown by the selector on startup; the earliest day when unset or unknown
    pub default_day: Option<String>,
    pub plot_cache_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Daily Quantity Dashboard".to_string(),
            header: "A simple analytical dashboard".to_string(),
            overview: "Each series is one day of records, plotted against the time of day. \
                       Pick a date below to look at a single day on its own."
                .to_string(),
            default_day: None,
            plot_cache_size: 16,
        }
    }
}

impl Config {
    /// Load from `path`, or from the user config directory when no path is given.
    ///
    /// An explicit path must exist; the user config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| DashError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `<config dir>/daydash/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("daydash").join("config.toml"))
    }
}
