//! FormatRange and the tiling primitives
//!
//! Most edits are easiest to express on a dense, one-value-per-position
//! view of a formatter's ranges. [`tile_ranges`] expands ranges into that
//! view and [`to_ranges`] collapses it back into maximal coalesced runs.

use crate::value::FormatValue;
use serde::{Deserialize, Serialize};

/// Half-open interval `[start_index, end_index)` over slot offsets carrying a value
///
/// Serializes as `{"startIndex": 2, "endIndex": 5, "value": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRange {
    pub start_index: usize,
    pub end_index: usize,
    pub value: FormatValue,
}

impl FormatRange {
    pub fn new(start_index: usize, end_index: usize, value: impl Into<FormatValue>) -> Self {
        Self {
            start_index,
            end_index,
            value: value.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    /// `true` if the range shares at least one position with `[start, end)`
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start_index < end && self.end_index > start
    }

    /// The part of this range inside `[start, end)`, if any
    pub fn clip(&self, start: usize, end: usize) -> Option<FormatRange> {
        let clipped = FormatRange {
            start_index: self.start_index.max(start),
            end_index: self.end_index.min(end),
            value: self.value.clone(),
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

/// Expand ranges into one value per position
///
/// The result is as long as the furthest `end_index`, clipped to `limit`
/// (the slot length). Later ranges overwrite earlier ones where they
/// intersect.
pub fn tile_ranges(ranges: &[FormatRange], limit: usize) -> Vec<Option<FormatValue>> {
    let len = ranges
        .iter()
        .map(|r| r.end_index)
        .max()
        .unwrap_or(0)
        .min(limit);

    let mut values: Vec<Option<FormatValue>> = vec![None; len];
    for range in ranges {
        let end = range.end_index.min(len);
        for slot in values.iter_mut().take(end).skip(range.start_index) {
            *slot = Some(range.value.clone());
        }
    }
    values
}

/// Collapse a dense value array into coalesced ranges
///
/// `None` breaks a run; adjacent equal values extend it.
pub fn to_ranges(values: &[Option<FormatValue>]) -> Vec<FormatRange> {
    let mut ranges: Vec<FormatRange> = Vec::new();
    let mut current: Option<FormatRange> = None;

    for (index, value) in values.iter().enumerate() {
        let Some(value) = value else {
            if let Some(run) = current.take() {
                ranges.push(run);
            }
            continue;
        };

        if let Some(run) = current.as_mut() {
            if run.value == *value {
                run.end_index = index + 1;
                continue;
            }
        }

        if let Some(run) = current.take() {
            ranges.push(run);
        }
        current = Some(FormatRange {
            start_index: index,
            end_index: index + 1,
            value: value.clone(),
        });
    }

    if let Some(run) = current {
        ranges.push(run);
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Option<FormatValue> {
        Some(FormatValue::bool(true))
    }

    #[test]
    fn test_tile_fills_and_overwrites() {
        let ranges = vec![
            FormatRange::new(1, 4, 1i64),
            FormatRange::new(3, 5, 2i64),
        ];
        let tiled = tile_ranges(&ranges, 10);

        assert_eq!(
            tiled,
            vec![
                None,
                Some(FormatValue::int(1)),
                Some(FormatValue::int(1)),
                Some(FormatValue::int(2)),
                Some(FormatValue::int(2)),
            ]
        );
    }

    #[test]
    fn test_tile_clips_to_limit() {
        let ranges = vec![FormatRange::new(2, 8, true)];
        let tiled = tile_ranges(&ranges, 4);
        assert_eq!(tiled, vec![None, None, t(), t()]);
    }

    #[test]
    fn test_tile_empty() {
        assert!(tile_ranges(&[], 10).is_empty());
    }

    #[test]
    fn test_to_ranges_coalesces_runs() {
        let values = vec![None, t(), t(), Some(FormatValue::int(3)), None, t()];
        let ranges = to_ranges(&values);

        assert_eq!(
            ranges,
            vec![
                FormatRange::new(1, 3, true),
                FormatRange::new(3, 4, 3i64),
                FormatRange::new(5, 6, true),
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let values = vec![None, t(), None, Some(FormatValue::str("a")), Some(FormatValue::str("a"))];
        assert_eq!(tile_ranges(&to_ranges(&values), values.len()), values);
    }

    #[test]
    fn test_clip_and_intersects() {
        let range = FormatRange::new(2, 6, true);
        assert!(range.intersects(5, 9));
        assert!(!range.intersects(6, 9));
        assert_eq!(range.clip(4, 9), Some(FormatRange::new(4, 6, true)));
        assert_eq!(range.clip(6, 9), None);
        assert_eq!(range.len(), 4);
    }
}
