use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::error::{DashError, DateTimeError, Result};
use crate::types::{RawTable, Record, Row, Table};

/// Fixed format of the date-time field, minus the trailing zone name.
pub const DATETIME_FORMAT: &str = "%a, %d %b %Y, %H:%M:%S";

/// What to do with a record whose date-time field cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidDateTimePolicy {
    /// Abort normalization with an error naming the line
    #[default]
    Fail,
    /// Drop the row, log a warning and remember its line in `Table::dropped`
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub datetime: NaiveDateTime,
    pub timezone: String,
}

/// Parse `"<weekday>, <day> <month> <year>, <HH:MM:SS> <tz>"`.
///
/// The zone is kept as text and not applied; the weekday must agree with the date.
pub fn parse_datetime(raw: &str) -> std::result::Result<ParsedDateTime, DateTimeError> {
    let raw = raw.trim();
    let (stamp, zone) = raw.rsplit_once(' ').ok_or(DateTimeError::MissingTimezone)?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DateTimeError::InvalidTimezone(zone.to_string()));
    }
    let datetime = NaiveDateTime::parse_from_str(stamp.trim_end(), DATETIME_FORMAT)?;
    Ok(ParsedDateTime {
        datetime,
        timezone: zone.to_string(),
    })
}

/// Coerce a quantity to an integer. Numeric strings are trimmed first;
/// floats, booleans and anything else are rejected rather than defaulted.
pub fn coerce_quantity(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Turns loaded records into a [`Table`] sorted by time of day.
#[derive(Clone, Debug)]
pub struct Normalizer {
    pub datetime_field: String,
    pub quantity_field: String,
    pub on_invalid_datetime: InvalidDateTimePolicy,
}

impl Normalizer {
    pub fn new(datetime_field: impl Into<String>, quantity_field: impl Into<String>) -> Self {
        Self {
            datetime_field: datetime_field.into(),
            quantity_field: quantity_field.into(),
            on_invalid_datetime: InvalidDateTimePolicy::default(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            datetime_field: config.datetime_field.clone(),
            quantity_field: config.quantity_field.clone(),
            on_invalid_datetime: config.on_invalid_datetime,
        }
    }

    pub fn with_policy(mut self, policy: InvalidDateTimePolicy) -> Self {
        self.on_invalid_datetime = policy;
        self
    }

    pub fn normalize(&self, raw: RawTable) -> Result<Table> {
        let mut table = Table {
            rows: Vec::with_capacity(raw.len()),
            dropped: Vec::new(),
        };

        for (line, record) in raw.records {
            let parsed = match self.datetime_of(line, &record) {
                Ok(parsed) => parsed,
                Err(err) if self.on_invalid_datetime == InvalidDateTimePolicy::Skip => {
                    warn!(line, error = %err, "dropping record with unparseable date-time");
                    table.dropped.push(line);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let raw_qty = record
                .get(&self.quantity_field)
                .ok_or_else(|| DashError::MissingField {
                    line,
                    field: self.quantity_field.clone(),
                })?;
            let quantity = coerce_quantity(raw_qty).ok_or_else(|| DashError::InvalidQuantity {
                line,
                value: raw_qty.to_string(),
            })?;

            table.rows.push(Row::new(
                line,
                record,
                parsed.datetime,
                parsed.timezone,
                quantity,
            ));
        }

        // stable: equal times keep input order
        table.rows.sort_by_key(|row| row.time);

        debug!(
            rows = table.rows.len(),
            dropped = table.dropped.len(),
            "normalized table"
        );
        Ok(table)
    }

    fn datetime_of(&self, line: usize, record: &Record) -> Result<ParsedDateTime> {
        let value = record
            .get(&self.datetime_field)
            .ok_or_else(|| DashError::MissingField {
                line,
                field: self.datetime_field.clone(),
            })?;
        let text = value.as_str().ok_or_else(|| DashError::InvalidDateTime {
            line,
            value: value.to_string(),
            source: DateTimeError::NotText,
        })?;
        parse_datetime(text).map_err(|source| DashError::InvalidDateTime {
            line,
            value: text.to_string(),
            source,
        })
    }
}
