//! Edit propagation and extraction
//!
//! The owning slot reports every length-changing edit so stored ranges stay
//! aligned with the content:
//!
//! - [`stretch`](RangeStore::stretch): insertion whose atoms inherit the
//!   surrounding formatting
//! - [`split`](RangeStore::split): insertion of unformatted positions
//! - [`shrink`](RangeStore::shrink): deletion
//!
//! Extraction produces independent copies and never mutates the source.

use super::range::{tile_ranges, to_ranges, FormatRange};
use super::store::{group_by_value, normalize, FormatEntry, RangeStore};
use std::collections::BTreeMap;
use std::iter;

impl RangeStore {
    /// Insert `count` positions at `index`, growing ranges that reach it
    ///
    /// Ranges ending before `index` are untouched, ranges ending at or after
    /// it grow by `count`, and ranges starting at or after it shift right.
    /// Block-scope ranges keep covering the whole slot.
    pub fn stretch(&mut self, index: usize, count: usize) {
        for entry in self.entries.values_mut() {
            let block = entry.formatter.is_block();
            for range in entry.ranges.iter_mut() {
                if block {
                    range.end_index += count;
                    continue;
                }
                if range.end_index < index {
                    continue;
                }
                range.end_index += count;
                if range.start_index >= index {
                    range.start_index += count;
                }
            }
        }
        self.slot_len += count;
        log::debug!("stretch {} by {}: slot length {}", index, count, self.slot_len);
    }

    /// Insert `distance` unformatted positions at `index`
    ///
    /// Inline ranges are tiled, the gap is spliced in, and the result is
    /// collapsed again, so a range straddling `index` is cut in two.
    /// Block-scope ranges grow by `distance`.
    pub fn split(&mut self, index: usize, distance: usize) {
        let limit = self.slot_len;
        for entry in self.entries.values_mut() {
            if entry.formatter.is_block() {
                for range in entry.ranges.iter_mut() {
                    range.end_index += distance;
                }
                continue;
            }

            let ranges = std::mem::take(&mut entry.ranges);
            entry.ranges = if entry.formatter.overlap {
                let mut spliced: Vec<FormatRange> = group_by_value(ranges)
                    .into_iter()
                    .flat_map(|(_, group)| splice_gap(&group, index, distance, limit))
                    .collect();
                spliced.sort_by_key(|range| range.start_index);
                spliced
            } else {
                splice_gap(&ranges, index, distance, limit)
            };
        }
        self.slot_len += distance;
        log::debug!("split {} by {}: slot length {}", index, distance, self.slot_len);
    }

    /// Delete `count` positions starting at `start_index`
    ///
    /// Range ends and starts inside or after the deleted span move left by
    /// up to `count`, never past `start_index`. Every list is normalized
    /// afterwards and formatters left without ranges are dropped.
    pub fn shrink(&mut self, start_index: usize, count: usize) {
        for entry in self.entries.values_mut() {
            for range in entry.ranges.iter_mut() {
                if range.end_index > start_index {
                    range.end_index = range.end_index.saturating_sub(count).max(start_index);
                }
                if range.start_index > start_index {
                    range.start_index = range.start_index.saturating_sub(count).max(start_index);
                }
            }
        }
        self.slot_len = self.slot_len.saturating_sub(count);

        let limit = self.slot_len;
        let entries = std::mem::take(&mut self.entries);
        for (id, entry) in entries {
            let ranges = normalize(&entry.formatter, entry.ranges, limit);
            if !ranges.is_empty() {
                self.entries.insert(
                    id,
                    FormatEntry {
                        formatter: entry.formatter,
                        ranges,
                    },
                );
            }
        }
        log::debug!(
            "shrink {} by {}: slot length {}",
            start_index,
            count,
            self.slot_len
        );
    }

    /// Copy of the formatting inside `[start_index, end_index)`
    ///
    /// Ranges are clipped to the window; offsets stay relative to this slot.
    pub fn extract(&self, start_index: usize, end_index: usize) -> RangeStore {
        let mut entries = BTreeMap::new();
        for (id, entry) in &self.entries {
            let ranges: Vec<FormatRange> = entry
                .ranges
                .iter()
                .filter_map(|range| range.clip(start_index, end_index))
                .collect();
            if !ranges.is_empty() {
                entries.insert(
                    *id,
                    FormatEntry {
                        formatter: entry.formatter.clone(),
                        ranges,
                    },
                );
            }
        }
        RangeStore {
            slot_len: self.slot_len,
            entries,
        }
    }

    /// Formatting of `[start_index, end_index)` rebased onto a new slot
    ///
    /// Like [`extract`](RangeStore::extract), with offsets shifted so that
    /// `start_index` becomes `0`. The result is bound to a slot of
    /// `slot_len` positions.
    pub fn create_format_by_range(
        &self,
        slot_len: usize,
        start_index: usize,
        end_index: usize,
    ) -> RangeStore {
        let mut store = self.extract(start_index, end_index);
        for entry in store.entries.values_mut() {
            for range in entry.ranges.iter_mut() {
                range.start_index -= start_index;
                range.end_index -= start_index;
            }
        }
        store.slot_len = slot_len;
        store
    }
}

fn splice_gap(
    ranges: &[FormatRange],
    index: usize,
    distance: usize,
    limit: usize,
) -> Vec<FormatRange> {
    let mut values = tile_ranges(ranges, limit);
    if index <= values.len() {
        values.splice(index..index, iter::repeat(None).take(distance));
    }
    to_ranges(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{Formatter, FormatterConfig, FormatterRegistry};
    use crate::value::{FormatRule, FormatValue};
    use std::sync::Arc;

    fn formatters() -> (Arc<Formatter>, Arc<Formatter>, Arc<Formatter>) {
        let mut registry = FormatterRegistry::new();
        (
            registry.register(FormatterConfig::inline("bold")),
            registry.register(FormatterConfig::inline("comment").overlap(true)),
            registry.register(FormatterConfig::block("align")),
        )
    }

    fn bold_store(bold: &Arc<Formatter>) -> RangeStore {
        let mut store = RangeStore::new(10);
        store
            .merge(bold, 2, 5, FormatRule::Set(FormatValue::bool(true)))
            .merge(bold, 4, 8, FormatRule::Set(FormatValue::bool(true)));
        store
    }

    #[test]
    fn test_merge_stretch_shrink_sequence() {
        let (bold, _, _) = formatters();
        let mut store = bold_store(&bold);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(2, 8, true)]);

        store.stretch(3, 1);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(2, 9, true)]);
        assert_eq!(store.slot_len(), 11);

        store.shrink(3, 2);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(2, 7, true)]);
        assert_eq!(store.slot_len(), 9);
    }

    #[test]
    fn test_stretch_before_and_after() {
        let (bold, _, _) = formatters();
        let mut store = RangeStore::new(10);
        store.merge(&bold, 4, 6, FormatRule::Set(FormatValue::bool(true)));

        store.stretch(8, 2);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(4, 6, true)]);

        store.stretch(1, 3);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(7, 9, true)]);

        // insertion at the end boundary is absorbed
        store.stretch(9, 1);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(7, 10, true)]);
    }

    #[test]
    fn test_stretch_keeps_block_whole() {
        let (_, _, align) = formatters();
        let mut store = RangeStore::new(5);
        store.merge(&align, 0, 5, FormatRule::Set(FormatValue::str("center")));

        store.stretch(0, 3);
        assert_eq!(store.get(&align).unwrap(), &[FormatRange::new(0, 8, "center")]);
    }

    #[test]
    fn test_split_cuts_straddling_range() {
        let (bold, _, align) = formatters();
        let mut store = bold_store(&bold);
        store.merge(&align, 0, 10, FormatRule::Set(FormatValue::str("left")));

        store.split(4, 2);

        assert_eq!(
            store.get(&bold).unwrap(),
            &[FormatRange::new(2, 4, true), FormatRange::new(6, 10, true)]
        );
        assert_eq!(store.get(&align).unwrap(), &[FormatRange::new(0, 12, "left")]);
        assert_eq!(store.slot_len(), 12);
    }

    #[test]
    fn test_split_after_all_ranges_is_noop() {
        let (bold, _, _) = formatters();
        let mut store = bold_store(&bold);
        store.split(9, 3);

        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(2, 8, true)]);
    }

    #[test]
    fn test_split_overlap_groups_independently() {
        let (_, comment, _) = formatters();
        let mut store = RangeStore::new(10);
        store.merge(&comment, 0, 6, FormatRule::Set(FormatValue::int(1)));
        store.merge(&comment, 3, 9, FormatRule::Set(FormatValue::int(2)));

        store.split(5, 1);

        assert_eq!(
            store.get(&comment).unwrap(),
            &[
                FormatRange::new(0, 5, 1i64),
                FormatRange::new(3, 5, 2i64),
                FormatRange::new(6, 7, 1i64),
                FormatRange::new(6, 10, 2i64),
            ]
        );
    }

    #[test]
    fn test_shrink_removes_swallowed_range() {
        let (bold, _, _) = formatters();
        let mut store = RangeStore::new(10);
        store.merge(&bold, 3, 5, FormatRule::Set(FormatValue::bool(true)));

        store.shrink(2, 4);
        assert!(store.get(&bold).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_shrink_coalesces_neighbours() {
        let (bold, _, _) = formatters();
        let mut store = RangeStore::new(10);
        store.merge(&bold, 0, 3, FormatRule::Set(FormatValue::bool(true)));
        store.merge(&bold, 5, 8, FormatRule::Set(FormatValue::bool(true)));

        store.shrink(3, 2);
        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(0, 6, true)]);
    }

    #[test]
    fn test_extract_clips_without_mutating() {
        let (bold, comment, _) = formatters();
        let mut store = bold_store(&bold);
        store.merge(&comment, 0, 2, FormatRule::Set(FormatValue::int(1)));

        let extracted = store.extract(3, 6);
        assert_eq!(extracted.get(&bold).unwrap(), &[FormatRange::new(3, 6, true)]);
        assert!(extracted.get(&comment).is_none());
        assert_eq!(extracted.slot_len(), 10);

        assert_eq!(store.get(&bold).unwrap(), &[FormatRange::new(2, 8, true)]);
    }

    #[test]
    fn test_create_format_by_range_rebases() {
        let (bold, _, _) = formatters();
        let store = bold_store(&bold);

        let sub = store.create_format_by_range(4, 5, 9);
        assert_eq!(sub.get(&bold).unwrap(), &[FormatRange::new(0, 3, true)]);
        assert_eq!(sub.slot_len(), 4);
    }
}
