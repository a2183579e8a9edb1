//! FormatTree: well-nested decomposition of a slot's formatting
//!
//! Independently authored ranges do not nest, but nested markup needs
//! well-nested open/close boundaries. [`RangeStore::to_tree`] splits a
//! window into children until every node's formats cover the node's
//! entire width.
//!
//! # Algorithm
//!
//! For a window `[start, end)`:
//!
//! 1. Extract an owned copy of the store clipped to the window.
//! 2. Ranges exactly covering the window are consumed onto the node, except
//!    columned ones, which are deferred.
//! 3. If anything else remains, split at the tightest next sub-window: the
//!    smallest remaining start, extended to the largest end sharing it.
//!    Leading, middle and trailing children are built recursively from the
//!    copy, so deferred columned ranges are re-applied inside each child.
//!    Children with no formats of their own are spliced into the parent.
//! 4. Otherwise the node is a leaf and takes the deferred columned ranges.
//!
//! Every recursion works on its own extracted copy; nothing is shared with
//! the caller's store.
//!
//! # Example
//!
//! ```rust
//! use formatkit_core::format::RangeStore;
//! use formatkit_core::formatter::{FormatterConfig, FormatterRegistry};
//! use formatkit_core::value::{FormatRule, FormatValue};
//!
//! let mut registry = FormatterRegistry::new();
//! let bold = registry.register(FormatterConfig::inline("bold"));
//! let italic = registry.register(FormatterConfig::inline("italic"));
//!
//! let mut store = RangeStore::new(10);
//! store
//!     .merge(&bold, 0, 10, FormatRule::Set(FormatValue::bool(true)))
//!     .merge(&italic, 3, 7, FormatRule::Set(FormatValue::bool(true)));
//!
//! let tree = store.to_tree(0, 10);
//! assert_eq!(tree.formats[0].formatter.name, "bold");
//! assert_eq!(tree.leaves(), vec![(0, 3), (3, 7), (7, 10)]);
//! ```

use super::store::{FormatItem, RangeStore};
use serde::Serialize;
use std::sync::Arc;

/// Node of a format tree
///
/// `formats` hold the formatter/value pairs valid over the whole node;
/// `children` partition the node's span. Both serialize only when
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatTree {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<FormatItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormatTree>,
}

impl FormatTree {
    /// Unformatted leaf
    pub fn leaf(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
            formats: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf spans in document order
    pub fn leaves(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        self.collect_leaves(&mut spans);
        spans
    }

    fn collect_leaves(&self, spans: &mut Vec<(usize, usize)>) {
        if self.is_leaf() {
            spans.push((self.start_index, self.end_index));
        } else {
            for child in &self.children {
                child.collect_leaves(spans);
            }
        }
    }
}

impl RangeStore {
    /// Build the format tree of `[start_index, end_index)`
    ///
    /// The leaves partition the window exactly and every node's formats are
    /// valid across its full width.
    pub fn to_tree(&self, start_index: usize, end_index: usize) -> FormatTree {
        debug_assert!(
            start_index <= end_index,
            "reversed tree window {}..{}",
            start_index,
            end_index
        );

        let mut working = self.extract(start_index, end_index);
        let mut formats: Vec<FormatItem> = Vec::new();
        let mut columned: Vec<FormatItem> = Vec::new();

        for entry in working.entries.values_mut() {
            let formatter = &entry.formatter;
            entry.ranges.retain(|range| {
                if range.start_index != start_index || range.end_index != end_index {
                    return true;
                }
                let item = FormatItem::new(Arc::clone(formatter), range.clone());
                if formatter.columned {
                    columned.push(item);
                    true
                } else {
                    formats.push(item);
                    false
                }
            });
        }
        working.entries.retain(|_, entry| !entry.ranges.is_empty());

        let remaining: usize = working.entries.values().map(|e| e.ranges.len()).sum();
        let mut children = Vec::new();

        match working.next_window(start_index, end_index) {
            Some((next_start, next_end)) if remaining > columned.len() => {
                log::trace!(
                    "split {}..{} at {}..{}",
                    start_index,
                    end_index,
                    next_start,
                    next_end
                );
                if start_index < next_start {
                    let leading = if columned.is_empty() {
                        FormatTree::leaf(start_index, next_start)
                    } else {
                        working.to_tree(start_index, next_start)
                    };
                    push_child(&mut children, leading);
                }
                push_child(&mut children, working.to_tree(next_start, next_end));
                if next_end < end_index {
                    push_child(&mut children, working.to_tree(next_end, end_index));
                }
            }
            _ => formats.extend(columned),
        }

        FormatTree {
            start_index,
            end_index,
            formats,
            children,
        }
    }

    /// Smallest start among ranges not covering the whole window, extended
    /// to the largest end sharing that start
    fn next_window(&self, start_index: usize, end_index: usize) -> Option<(usize, usize)> {
        let mut window: Option<(usize, usize)> = None;
        for range in self.entries.values().flat_map(|entry| entry.ranges.iter()) {
            if range.start_index == start_index && range.end_index == end_index {
                continue;
            }
            window = match window {
                Some((start, end)) if range.start_index > start => Some((start, end)),
                Some((start, end)) if range.start_index == start => {
                    Some((start, end.max(range.end_index)))
                }
                _ => Some((range.start_index, range.end_index)),
            };
        }
        window
    }
}

/// Append `child`, flattening nodes that only group further children
fn push_child(children: &mut Vec<FormatTree>, child: FormatTree) {
    if child.formats.is_empty() && !child.children.is_empty() {
        children.extend(child.children);
    } else {
        children.push(child);
    }
}
