//! Axis ranges for the charts.

/// Seconds in a day; the widest x-range either chart uses.
pub const DAY_SECONDS: f64 = 86_400.0;

/// Padding added around a single day's time range.
const TIME_PAD_SECONDS: f64 = 60.0;

/// y-range covering `values` with 5% headroom on both ends.
pub fn quantity_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }

    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// x-range fitted to the given seconds-of-day, clamped to the day.
pub fn time_range(xs: &[f64]) -> (f64, f64) {
    let (min, max) = xs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    });

    if min > max {
        return (0.0, DAY_SECONDS);
    }

    (
        (min - TIME_PAD_SECONDS).max(0.0),
        (max + TIME_PAD_SECONDS).min(DAY_SECONDS),
    )
}

/// Narrowest overlay window the zoom controls allow.
pub const MIN_WINDOW_SECONDS: u32 = 60;

const DAY_SECONDS_U32: u32 = 86_400;

/// Visible part of the day on the overlay x-axis, in whole seconds.
///
/// Always within `0..=86_400` and at least [`MIN_WINDOW_SECONDS`] wide.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct TimeWindow {
    start: u32,
    end: u32,
}

impl TimeWindow {
    pub const FULL_DAY: Self = Self {
        start: 0,
        end: DAY_SECONDS_U32,
    };

    /// Clamp `start..end` into the day, widening it to the minimum width if needed.
    pub fn new(start: u32, end: u32) -> Self {
        let start = start.min(DAY_SECONDS_U32 - MIN_WINDOW_SECONDS);
        let end = end.clamp(start + MIN_WINDOW_SECONDS, DAY_SECONDS_U32);
        Self { start, end }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn is_full_day(&self) -> bool {
        *self == Self::FULL_DAY
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= f64::from(self.start) && x <= f64::from(self.end)
    }

    pub fn range(&self) -> (f64, f64) {
        (f64::from(self.start), f64::from(self.end))
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// `HH:MM:SS` label for a seconds-of-day coordinate.
pub fn format_time_tick(x: f64) -> String {
    let secs = x.round().clamp(0.0, DAY_SECONDS) as u32;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Quantity label with the configured prefix and K/M suffixes for large values.
pub fn format_quantity_tick(y: f64, prefix: &str) -> String {
    let sign = if y < 0.0 { "-" } else { "" };
    let abs = y.abs();
    if abs >= 1_000_000.0 {
        format!("{sign}{prefix}{:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}{prefix}{:.1}K", abs / 1_000.0)
    } else {
        format!("{sign}{prefix}{:.0}", abs)
    }
}
