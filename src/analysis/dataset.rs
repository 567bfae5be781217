use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::loader::load_records;
use super::normalize::Normalizer;
use super::partition::{DayOrder, DayPartition};
use crate::config::DataConfig;
use crate::error::Result;
use crate::types::{DayGroup, Row, Table};

/// The loaded table and its day partition. Built once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    source: PathBuf,
    table: Table,
    partition: DayPartition,
}

impl Dataset {
    pub fn from_table(source: impl Into<PathBuf>, table: Table, order: DayOrder) -> Self {
        let partition = DayPartition::build(&table, order);
        Self {
            source: source.into(),
            table,
            partition,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn partition(&self) -> &DayPartition {
        &self.partition
    }

    /// Days in partition order.
    pub fn days(&self) -> impl Iterator<Item = DaySlice<'_>> {
        self.partition.groups().iter().map(move |group| DaySlice {
            table: &self.table,
            group,
        })
    }

    /// Direct lookup by date key; `None` for a day with no rows.
    pub fn select(&self, key: &str) -> Option<DaySlice<'_>> {
        self.partition.get(key).map(|group| DaySlice {
            table: &self.table,
            group,
        })
    }

    pub fn day_keys(&self) -> impl Iterator<Item = &str> {
        self.partition.keys()
    }

    /// `preferred` if it names a known day, else the earliest calendar day,
    /// whatever the partition order.
    pub fn default_day(&self, preferred: Option<&str>) -> Option<&str> {
        if let Some(key) = preferred {
            if let Some(group) = self.partition.get(key) {
                return Some(group.key.as_str());
            }
            warn!(day = key, "configured default day has no records");
        }
        self.partition
            .groups()
            .iter()
            .min_by_key(|group| group.date)
            .map(|group| group.key.as_str())
    }
}

/// Borrowed view of one day's rows.
#[derive(Clone, Copy, Debug)]
pub struct DaySlice<'a> {
    table: &'a Table,
    group: &'a DayGroup,
}

impl<'a> DaySlice<'a> {
    pub fn date(&self) -> NaiveDate {
        self.group.date
    }

    pub fn key(&self) -> &'a str {
        &self.group.key
    }

    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Rows of the day in time order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + 'a {
        let table = self.table;
        self.group.rows.iter().map(move |&idx| &table.rows[idx])
    }

    /// `(min, max)` quantity of the day.
    pub fn quantity_bounds(&self) -> Option<(i64, i64)> {
        self.rows().fold(None, |acc, row| match acc {
            None => Some((row.quantity, row.quantity)),
            Some((lo, hi)) => Some((lo.min(row.quantity), hi.max(row.quantity))),
        })
    }
}

/// Load, normalize and partition the configured input.
pub fn build_dataset(config: &DataConfig) -> Result<Dataset> {
    info!(path = %config.input.display(), "loading records");
    let raw = load_records(&config.input)?;
    let table = Normalizer::from_config(config).normalize(raw)?;
    let dataset = Dataset::from_table(config.input.clone(), table, config.day_order);
    info!(
        rows = dataset.table.len(),
        days = dataset.partition.len(),
        dropped = dataset.table.dropped.len(),
        "dataset ready"
    );
    Ok(dataset)
}
