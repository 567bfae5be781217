use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{DayGroup, Table};

/// Order in which days are listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayOrder {
    /// Order of each day's first row in the time-sorted table
    #[default]
    FirstSeen,
    /// Calendar order
    Ascending,
}

/// A partition of a [`Table`] into calendar days.
///
/// Both the iterable grouping and the keyed lookup read from the same groups,
/// so they cannot disagree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayPartition {
    groups: Vec<DayGroup>,
    index: HashMap<String, usize>,
}

impl DayPartition {
    pub fn build(table: &Table, order: DayOrder) -> Self {
        let mut groups: Vec<DayGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let key = row.date_key();
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    groups.push(DayGroup::new(row.date));
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].rows.push(row_idx);
        }

        if order == DayOrder::Ascending {
            groups.sort_by_key(|group| group.date);
            index = groups
                .iter()
                .enumerate()
                .map(|(slot, group)| (group.key.clone(), slot))
                .collect();
        }

        Self { groups, index }
    }

    pub fn groups(&self) -> &[DayGroup] {
        &self.groups
    }

    pub fn get(&self, key: &str) -> Option<&DayGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows across all groups; equals the table length.
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(DayGroup::len).sum()
    }
}
