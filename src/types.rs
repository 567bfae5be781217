//! # Common Types
//!
//! This module contains the types shared by the loader, the normalizer and the
//! charting layer: raw records as read from disk, normalized rows, and the
//! per-day groups the dashboard dispatches on.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Value};

/// Format of [`Row::date_str`], e.g. `2012-Jan-01`.
pub const DATE_STR_FORMAT: &str = "%Y-%b-%d";

/// Format of [`Row::time_str`].
pub const TIME_STR_FORMAT: &str = "%H:%M:%S";

/// One input line: field name to scalar value, in the order the fields appeared.
pub type Record = Map<String, Value>;

/// Records in file order, before any normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    /// `(1-based source line, record)` pairs
    pub records: Vec<(usize, Record)>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of all field names, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        union_of_keys(self.records.iter().map(|(_, record)| record))
    }
}

fn union_of_keys<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// A normalized record with all derived date/time columns populated.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Source line in the input file
    pub line: usize,
    /// The record exactly as loaded
    pub record: Record,
    /// Parsed date-time, without the zone
    pub datetime: NaiveDateTime,
    /// Zone abbreviation that trailed the date-time (`GMT`, `UTC`, ...)
    pub timezone: String,
    /// Calendar date, the grouping key
    pub date: NaiveDate,
    /// Date formatted as `%Y-%b-%d`
    pub date_str: String,
    /// Time of day
    pub time: NaiveTime,
    /// Time formatted as `%H:%M:%S`
    pub time_str: String,
    /// Time of day anchored on 1900-01-01, so every day shares one x-axis
    pub time_point: NaiveDateTime,
    /// The quantity field coerced to an integer
    pub quantity: i64,
}

impl Row {
    pub fn new(
        line: usize,
        record: Record,
        datetime: NaiveDateTime,
        timezone: String,
        quantity: i64,
    ) -> Self {
        let date = datetime.date();
        let time = datetime.time();
        Self {
            line,
            record,
            datetime,
            timezone,
            date,
            date_str: datetime.format(DATE_STR_FORMAT).to_string(),
            time,
            time_str: datetime.format(TIME_STR_FORMAT).to_string(),
            time_point: time_anchor().and_time(time),
            quantity,
        }
    }

    /// Dispatch key of the row's day, e.g. `2012-01-01`.
    pub fn date_key(&self) -> String {
        self.date.to_string()
    }

    /// Seconds since midnight, used as the chart x coordinate.
    pub fn seconds_of_day(&self) -> u32 {
        self.time.num_seconds_from_midnight()
    }
}

/// Day every [`Row::time_point`] is anchored on.
pub fn time_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

/// The normalized table, sorted by time of day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
    /// Lines dropped because their date-time did not parse
    pub dropped: Vec<usize>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Union of the loaded field names, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        union_of_keys(self.rows.iter().map(|row| &row.record))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The rows of one calendar day, as indices into a [`Table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub key: String,
    /// Indices into `Table::rows`, in table order
    pub rows: Vec<usize>,
}

impl DayGroup {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            key: date.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
