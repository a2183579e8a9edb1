//! RangeStore: per-slot mapping of formatters to their ranges
//!
//! The store owns, for a single slot, every formatter's list of
//! [`FormatRange`]s and keeps those lists normalized:
//!
//! - a formatter with no ranges is absent, never an empty list
//! - ranges are clamped to `[0, slot_len]` and non-empty
//! - within one value group ranges are disjoint, sorted, and adjacent
//!   ranges never carry equal values
//!
//! For a non-overlap formatter the whole list is one value group. For an
//! overlap formatter every distinct value forms its own group, and groups
//! may cover the same offsets.
//!
//! # Merge strategies
//!
//! | scope  | overlap | behaviour                                          |
//! |--------|---------|----------------------------------------------------|
//! | Block  | false   | one whole-slot value, replaced on every set        |
//! | Block  | true    | one whole-slot layer per distinct value            |
//! | Inline | false   | paint the value over the interval, re-flatten      |
//! | Inline | true    | paint inside the matching value group only         |
//!
//! # Example
//!
//! ```rust
//! use formatkit_core::format::{FormatRange, RangeStore};
//! use formatkit_core::formatter::{FormatterConfig, FormatterRegistry};
//! use formatkit_core::value::{FormatRule, FormatValue};
//!
//! let mut registry = FormatterRegistry::new();
//! let bold = registry.register(FormatterConfig::inline("bold"));
//!
//! let mut store = RangeStore::new(10);
//! store
//!     .merge(&bold, 2, 5, FormatRule::Set(FormatValue::bool(true)))
//!     .merge(&bold, 4, 8, FormatRule::Set(FormatValue::bool(true)));
//!
//! assert_eq!(store.get(&bold), Some(&[FormatRange::new(2, 8, true)][..]));
//! ```

use super::range::{tile_ranges, to_ranges, FormatRange};
use crate::formatter::{FormatScope, Formatter, FormatterId};
use crate::value::{FormatRule, FormatValue};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A formatter together with one of its ranges
#[derive(Debug, Clone, PartialEq)]
pub struct FormatItem {
    pub formatter: Arc<Formatter>,
    pub range: FormatRange,
}

impl FormatItem {
    pub fn new(formatter: Arc<Formatter>, range: FormatRange) -> Self {
        Self { formatter, range }
    }

    pub fn value(&self) -> &FormatValue {
        &self.range.value
    }
}

/// Serializes as `{"formatter": name, "startIndex", "endIndex", "value"}`
impl Serialize for FormatItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FormatItem", 4)?;
        state.serialize_field("formatter", &self.formatter.name)?;
        state.serialize_field("startIndex", &self.range.start_index)?;
        state.serialize_field("endIndex", &self.range.end_index)?;
        state.serialize_field("value", &self.range.value)?;
        state.end()
    }
}

#[derive(Debug, Clone)]
pub(super) struct FormatEntry {
    pub(super) formatter: Arc<Formatter>,
    pub(super) ranges: Vec<FormatRange>,
}

/// Formatting-range index of one slot
///
/// Keyed by [`FormatterId`], so iteration follows registration order.
/// The store mirrors the slot length; the owning slot reports every
/// length-changing edit through [`stretch`](RangeStore::stretch),
/// [`split`](RangeStore::split) or [`shrink`](RangeStore::shrink).
#[derive(Debug, Clone, Default)]
pub struct RangeStore {
    pub(super) slot_len: usize,
    pub(super) entries: BTreeMap<FormatterId, FormatEntry>,
}

impl RangeStore {
    /// Create an empty store for a slot of `slot_len` positions
    pub fn new(slot_len: usize) -> Self {
        Self {
            slot_len,
            entries: BTreeMap::new(),
        }
    }

    /// Length of the slot this store is bound to
    pub fn slot_len(&self) -> usize {
        self.slot_len
    }

    /// `true` if no formatter has any range
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formatters that currently have ranges, in registration order
    pub fn formatters(&self) -> impl Iterator<Item = &Arc<Formatter>> {
        self.entries.values().map(|entry| &entry.formatter)
    }

    /// Ranges stored for `formatter`
    pub fn get(&self, formatter: &Formatter) -> Option<&[FormatRange]> {
        self.entries
            .get(&formatter.id)
            .map(|entry| entry.ranges.as_slice())
    }

    /// Drop every range of `formatter`
    pub fn remove(&mut self, formatter: &Formatter) -> Option<Vec<FormatRange>> {
        self.entries.remove(&formatter.id).map(|entry| entry.ranges)
    }

    /// Drop all formatting
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply or remove formatting over `[start_index, end_index)`
    ///
    /// Block-scope formatters ignore the interval and act on the whole slot.
    /// Indices are clamped to the slot length.
    ///
    /// # Preconditions
    ///
    /// `start_index <= end_index`. Reversed intervals are a caller bug and
    /// leave inline formatting untouched.
    pub fn merge(
        &mut self,
        formatter: &Arc<Formatter>,
        start_index: usize,
        end_index: usize,
        rule: FormatRule,
    ) -> &mut Self {
        debug_assert!(
            start_index <= end_index,
            "reversed merge range {}..{}",
            start_index,
            end_index
        );

        let existing = self
            .entries
            .remove(&formatter.id)
            .map(|entry| entry.ranges)
            .unwrap_or_default();
        let len = self.slot_len;

        let ranges = match (formatter.scope, formatter.overlap) {
            (FormatScope::Block, false) => merge_block(existing, &rule, len),
            (FormatScope::Block, true) => merge_block_layers(existing, &rule, len),
            (FormatScope::Inline, false) => paint(existing, start_index, end_index, &rule, len),
            (FormatScope::Inline, true) => {
                merge_inline_layers(existing, start_index, end_index, &rule, len)
            }
        };

        log::debug!(
            "merge {} {}..{} {:?}: {} range(s)",
            formatter.name,
            start_index,
            end_index,
            rule,
            ranges.len()
        );
        self.set_ranges(formatter, ranges);
        self
    }

    /// Store `ranges` for `formatter`, or drop the key if there are none
    pub(super) fn set_ranges(&mut self, formatter: &Arc<Formatter>, ranges: Vec<FormatRange>) {
        if ranges.is_empty() {
            self.entries.remove(&formatter.id);
        } else {
            self.entries.insert(
                formatter.id,
                FormatEntry {
                    formatter: Arc::clone(formatter),
                    ranges,
                },
            );
        }
    }
}

/// Re-establish the list invariants for `formatter` against `limit`
pub(super) fn normalize(
    formatter: &Formatter,
    ranges: Vec<FormatRange>,
    limit: usize,
) -> Vec<FormatRange> {
    if formatter.overlap {
        let mut normalized: Vec<FormatRange> = group_by_value(ranges)
            .into_iter()
            .flat_map(|(_, group)| to_ranges(&tile_ranges(&group, limit)))
            .collect();
        normalized.sort_by_key(|range| range.start_index);
        normalized
    } else {
        to_ranges(&tile_ranges(&ranges, limit))
    }
}

/// Split ranges into groups of equal value, in order of first appearance
pub(super) fn group_by_value(ranges: Vec<FormatRange>) -> Vec<(FormatValue, Vec<FormatRange>)> {
    let mut groups: Vec<(FormatValue, Vec<FormatRange>)> = Vec::new();
    for range in ranges {
        match groups.iter_mut().find(|(value, _)| *value == range.value) {
            Some((_, group)) => group.push(range),
            None => groups.push((range.value.clone(), vec![range])),
        }
    }
    groups
}

fn whole_slot(value: &FormatValue, len: usize) -> Option<FormatRange> {
    if len == 0 {
        None
    } else {
        Some(FormatRange {
            start_index: 0,
            end_index: len,
            value: value.clone(),
        })
    }
}

fn merge_block(existing: Vec<FormatRange>, rule: &FormatRule, len: usize) -> Vec<FormatRange> {
    match rule {
        FormatRule::Set(value) => whole_slot(value, len).into_iter().collect(),
        FormatRule::Clean(Some(value)) => {
            if existing.first().map(|range| &range.value) == Some(value) {
                Vec::new()
            } else {
                existing
            }
        }
        FormatRule::Clean(None) => existing,
        FormatRule::Remove => Vec::new(),
    }
}

fn merge_block_layers(
    mut existing: Vec<FormatRange>,
    rule: &FormatRule,
    len: usize,
) -> Vec<FormatRange> {
    match rule {
        FormatRule::Set(value) => {
            existing.extend(whole_slot(value, len));
            let mut layers: Vec<FormatRange> = group_by_value(existing)
                .into_iter()
                .flat_map(|(_, group)| to_ranges(&tile_ranges(&group, len)))
                .collect();
            layers.sort_by_key(|range| range.start_index);
            layers
        }
        FormatRule::Clean(Some(value)) => {
            existing.retain(|range| range.value != *value);
            existing
        }
        FormatRule::Clean(None) | FormatRule::Remove => Vec::new(),
    }
}

/// Paint `rule` over `[start, end)` of a single value group and re-flatten
fn paint(
    existing: Vec<FormatRange>,
    start: usize,
    end: usize,
    rule: &FormatRule,
    len: usize,
) -> Vec<FormatRange> {
    let start = start.min(len);
    let end = end.min(len);
    let mut values = tile_ranges(&existing, len);
    if start >= end {
        return to_ranges(&values);
    }
    if values.len() < end {
        values.resize(end, None);
    }

    for value in &mut values[start..end] {
        match rule {
            FormatRule::Set(new_value) => *value = Some(new_value.clone()),
            FormatRule::Remove => *value = None,
            FormatRule::Clean(Some(target)) => {
                if value.as_ref() == Some(target) {
                    *value = None;
                }
            }
            FormatRule::Clean(None) => {}
        }
    }
    to_ranges(&values)
}

fn merge_inline_layers(
    existing: Vec<FormatRange>,
    start: usize,
    end: usize,
    rule: &FormatRule,
    len: usize,
) -> Vec<FormatRange> {
    let mut groups = group_by_value(existing);

    match rule {
        FormatRule::Set(value) => {
            let index = match groups.iter().position(|(v, _)| v == value) {
                Some(index) => index,
                None => {
                    groups.push((value.clone(), Vec::new()));
                    groups.len() - 1
                }
            };
            let group = std::mem::take(&mut groups[index].1);
            groups[index].1 = paint(group, start, end, rule, len);
        }
        FormatRule::Clean(Some(value)) => {
            if let Some((_, group)) = groups.iter_mut().find(|(v, _)| v == value) {
                *group = paint(std::mem::take(group), start, end, &FormatRule::Remove, len);
            }
        }
        // no value group matches an absent value
        FormatRule::Clean(None) | FormatRule::Remove => {}
    }

    let mut ranges: Vec<FormatRange> = groups.into_iter().flat_map(|(_, group)| group).collect();
    ranges.sort_by_key(|range| range.start_index);
    ranges
}
