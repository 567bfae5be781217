pub mod aggregation;
pub mod range;

pub use aggregation::downsample;
pub use range::{
    format_quantity_tick, format_time_tick, quantity_range, time_range, TimeWindow, DAY_SECONDS,
    MIN_WINDOW_SECONDS,
};
