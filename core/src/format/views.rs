//! Read-only views over a RangeStore
//!
//! - [`extract_formats_by_index`](RangeStore::extract_formats_by_index):
//!   what a freshly typed atom at an offset should inherit
//! - [`to_grid`](RangeStore::to_grid): formatting-homogeneous run boundaries
//! - [`to_array`](RangeStore::to_array) / [`to_json`](RangeStore::to_json):
//!   flat and name-keyed snapshots
//!
//! The JSON view keys by formatter name. Two formatters sharing a name are
//! folded into one entry there, and [`RangeStore::from_json`] resolves a
//! name to its earliest registration.

use super::range::FormatRange;
use super::store::{normalize, FormatItem, RangeStore};
use crate::error::{FormatError, Result};
use crate::formatter::{Formatter, FormatterRegistry};
use crate::value::FormatValue;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Interchange shape: formatter name to its ordered ranges
pub type FormatsJson = BTreeMap<String, Vec<FormatRange>>;

impl RangeStore {
    /// Formatter/value pairs active at `index`
    ///
    /// At `0` these are the ranges starting at `0`; elsewhere the ranges
    /// with `start_index < index <= end_index`.
    pub fn extract_formats_by_index(&self, index: usize) -> Vec<(Arc<Formatter>, FormatValue)> {
        let mut formats = Vec::new();
        for entry in self.entries.values() {
            for range in &entry.ranges {
                let active = if index == 0 {
                    range.start_index == 0
                } else {
                    range.start_index < index && index <= range.end_index
                };
                if active {
                    formats.push((Arc::clone(&entry.formatter), range.value.clone()));
                }
            }
        }
        formats
    }

    /// Sorted boundaries: `0`, the slot length, and every range endpoint
    pub fn to_grid(&self) -> Vec<usize> {
        let mut grid = BTreeSet::new();
        grid.insert(0);
        grid.insert(self.slot_len);
        for entry in self.entries.values() {
            for range in &entry.ranges {
                grid.insert(range.start_index);
                grid.insert(range.end_index);
            }
        }
        grid.into_iter().collect()
    }

    /// Every stored range with its formatter, in registration order
    pub fn to_array(&self) -> Vec<FormatItem> {
        self.entries
            .values()
            .flat_map(|entry| {
                entry
                    .ranges
                    .iter()
                    .map(|range| FormatItem::new(Arc::clone(&entry.formatter), range.clone()))
            })
            .collect()
    }

    /// Name-keyed snapshot for interchange
    pub fn to_json(&self) -> FormatsJson {
        let mut json = FormatsJson::new();
        for entry in self.entries.values() {
            json.entry(entry.formatter.name.clone())
                .or_default()
                .extend(entry.ranges.iter().cloned());
        }
        json
    }

    /// Rebuild a store from its interchange shape
    ///
    /// Names are resolved through `registry`; every list is clamped and
    /// coalesced the same way a merge would. Block-scope entries are
    /// widened to cover the whole slot.
    pub fn from_json(
        registry: &FormatterRegistry,
        slot_len: usize,
        json: &FormatsJson,
    ) -> Result<RangeStore> {
        let mut store = RangeStore::new(slot_len);
        for (name, ranges) in json {
            let formatter = registry
                .find(name)
                .ok_or_else(|| FormatError::UnknownFormatter(name.clone()))?;
            let mut ranges = ranges.clone();
            if formatter.is_block() {
                for range in ranges.iter_mut() {
                    range.start_index = 0;
                    range.end_index = slot_len;
                }
            }
            let ranges = normalize(formatter, ranges, slot_len);
            store.set_ranges(formatter, ranges);
        }
        Ok(store)
    }
}
