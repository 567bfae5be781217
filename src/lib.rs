//! # Daily Quantity Dashboard
//!
//! `daydash` loads a flat file of mapping-literal records (one per line, the way
//! NeDB stores documents), normalizes their date-time and quantity fields, and
//! partitions the rows by calendar day. The result feeds an interactive
//! dashboard: every day overlaid on a shared time-of-day axis, plus a
//! single-day chart driven by a date selector.
//!
//! ## Features
//!
//! - JSON or Python-style mapping literals, one record per line
//! - Fixed-format date-time parsing with an explicit failure policy
//! - One day partition serving both ordered iteration and keyed lookup
//! - Overlay and single-day charts, on screen or written to PNG/SVG
//! - A seeded sample-data generator
//!
//! ## Example
//!
//! ```no_run
//! use daydash::{build_dataset, Config};
//!
//! let config = Config::load(None)?;
//! let dataset = build_dataset(&config.data)?;
//! for day in dataset.days() {
//!     println!("{}: {} rows", day.key(), day.len());
//! }
//! if let Some(day) = dataset.select("2012-01-01") {
//!     println!("selected {} rows", day.len());
//! }
//! # Ok::<(), daydash::DashError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{build_dataset, Dataset, DaySlice};
pub use app::App as DashboardApp;
pub use config::Config;
pub use error::{DashError, Result};
pub use types::{Record, Row, Table};
