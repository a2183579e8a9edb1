//! Slot: text content together with its formatting-range index
//!
//! A reference collaborator for the [`RangeStore`]. The slot owns the
//! content and its length, and reports every length-changing edit to the
//! store before any further merge or read, so the ranges always line up
//! with the text.
//!
//! Offsets count `char`s. Unlike the store, the slot validates its input
//! and reports out-of-range edits as errors.
//!
//! # Example
//!
//! ```rust
//! use formatkit_core::formatter::{FormatterConfig, FormatterRegistry};
//! use formatkit_core::slot::Slot;
//! use formatkit_core::value::{FormatRule, FormatValue};
//!
//! let mut registry = FormatterRegistry::new();
//! let bold = registry.register(FormatterConfig::inline("bold"));
//!
//! let mut slot = Slot::from_text("Hello World");
//! slot.apply_format(&bold, 0, 5, FormatRule::Set(FormatValue::bool(true))).unwrap();
//! slot.insert(5, "!!", &[]).unwrap();
//!
//! assert_eq!(slot.text(), "Hello!! World");
//! assert_eq!(slot.formats().get(&bold).unwrap()[0].end_index, 7);
//! ```

use crate::error::{FormatError, Result};
use crate::format::{FormatTree, FormatsJson, RangeStore};
use crate::formatter::{Formatter, FormatterRegistry};
use crate::value::{FormatRule, FormatValue};
use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized slot: `{"content": "...", "formats": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotJson {
    pub content: String,
    pub formats: FormatsJson,
}

/// Linear text content annotated with formatting ranges
#[derive(Debug, Clone, Default)]
pub struct Slot {
    content: Rope,
    formats: RangeStore,
}

impl Slot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unformatted slot holding `text`
    pub fn from_text(text: &str) -> Self {
        let content = Rope::from_str(text);
        let formats = RangeStore::new(content.len_chars());
        Self { content, formats }
    }

    /// Rebuild a slot from its serialized form
    pub fn from_json(registry: &FormatterRegistry, json: &SlotJson) -> Result<Self> {
        let content = Rope::from_str(&json.content);
        let formats = RangeStore::from_json(registry, content.len_chars(), &json.formats)?;
        Ok(Self { content, formats })
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.content.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn formats(&self) -> &RangeStore {
        &self.formats
    }

    /// Insert `text` at `index`
    ///
    /// With no explicit `formats` the store is stretched: a range that starts
    /// before `index` and ends at or after it grows over the new text, and
    /// ranges starting at or after `index` shift right. Text inserted at `0`
    /// therefore starts inline-unformatted; block formatting keeps covering
    /// the whole slot. With explicit `formats` the new text
    /// receives exactly the given formatter/value pairs.
    pub fn insert(
        &mut self,
        index: usize,
        text: &str,
        formats: &[(Arc<Formatter>, FormatValue)],
    ) -> Result<()> {
        let length = self.len();
        if index > length {
            return Err(FormatError::PositionOutOfBounds {
                position: index,
                length,
            });
        }

        let count = text.chars().count();
        if count == 0 {
            return Ok(());
        }

        self.content.insert(index, text);
        if formats.is_empty() {
            self.formats.stretch(index, count);
        } else {
            self.formats.split(index, count);
            for (formatter, value) in formats {
                self.formats
                    .merge(formatter, index, index + count, FormatRule::Set(value.clone()));
            }
        }
        Ok(())
    }

    /// Delete `count` chars starting at `index`
    pub fn delete(&mut self, index: usize, count: usize) -> Result<()> {
        self.check_range(index, index + count)?;
        if count == 0 {
            return Ok(());
        }

        self.content.remove(index..index + count);
        self.formats.shrink(index, count);
        Ok(())
    }

    /// Apply `rule` for `formatter` over `[start, end)`
    pub fn apply_format(
        &mut self,
        formatter: &Arc<Formatter>,
        start: usize,
        end: usize,
        rule: FormatRule,
    ) -> Result<()> {
        self.check_range(start, end)?;
        self.formats.merge(formatter, start, end, rule);
        Ok(())
    }

    /// Remove `[start, end)` and return it as an independent slot
    pub fn cut(&mut self, start: usize, end: usize) -> Result<Slot> {
        self.check_range(start, end)?;

        let content = Rope::from_str(&self.content.slice(start..end).to_string());
        let formats = self
            .formats
            .create_format_by_range(content.len_chars(), start, end);
        self.delete(start, end - start)?;

        Ok(Slot { content, formats })
    }

    /// Format tree of the whole slot
    pub fn to_tree(&self) -> FormatTree {
        self.formats.to_tree(0, self.len())
    }

    pub fn to_json(&self) -> SlotJson {
        SlotJson {
            content: self.text(),
            formats: self.formats.to_json(),
        }
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let length = self.len();
        if start > end || end > length {
            return Err(FormatError::InvalidRange { start, end, length });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatRange;
    use crate::formatter::FormatterConfig;

    fn registry() -> FormatterRegistry {
        let mut registry = FormatterRegistry::new();
        registry.register(FormatterConfig::inline("bold"));
        registry.register(FormatterConfig::inline("link"));
        registry.register(FormatterConfig::block("align"));
        registry
    }

    #[test]
    fn test_from_text() {
        let slot = Slot::from_text("héllo");
        assert_eq!(slot.len(), 5);
        assert_eq!(slot.formats().slot_len(), 5);
        assert!(slot.formats().is_empty());
        assert!(Slot::new().is_empty());
    }

    #[test]
    fn test_insert_inherits_formatting() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("abcdef");
        slot.apply_format(bold, 1, 4, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        slot.insert(2, "XY", &[]).unwrap();

        assert_eq!(slot.text(), "abXYcdef");
        assert_eq!(slot.formats().get(bold).unwrap(), &[FormatRange::new(1, 6, true)]);
    }

    #[test]
    fn test_insert_at_start_shifts_formatting() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("abc");
        slot.apply_format(bold, 0, 3, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        slot.insert(0, "X", &[]).unwrap();

        assert_eq!(slot.text(), "Xabc");
        assert_eq!(slot.formats().get(bold).unwrap(), &[FormatRange::new(1, 4, true)]);
    }

    #[test]
    fn test_insert_with_explicit_formats() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let link = registry.find("link").unwrap();
        let mut slot = Slot::from_text("abcdef");
        slot.apply_format(bold, 1, 4, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        slot.insert(2, "XY", &[(Arc::clone(link), FormatValue::str("u"))])
            .unwrap();

        assert_eq!(
            slot.formats().get(bold).unwrap(),
            &[FormatRange::new(1, 2, true), FormatRange::new(4, 6, true)]
        );
        assert_eq!(slot.formats().get(link).unwrap(), &[FormatRange::new(2, 4, "u")]);
        assert_eq!(slot.formats().slot_len(), 8);
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut slot = Slot::from_text("abc");
        let err = slot.insert(4, "x", &[]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::PositionOutOfBounds {
                position: 4,
                length: 3
            }
        ));
    }

    #[test]
    fn test_delete_shrinks_formatting() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("abcdefgh");
        slot.apply_format(bold, 2, 6, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        slot.delete(1, 3).unwrap();

        assert_eq!(slot.text(), "aefgh");
        assert_eq!(slot.formats().get(bold).unwrap(), &[FormatRange::new(1, 3, true)]);
        assert!(slot.delete(4, 2).is_err());
    }

    #[test]
    fn test_apply_format_rejects_bad_range() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("abc");

        let err = slot
            .apply_format(bold, 2, 1, FormatRule::Set(FormatValue::bool(true)))
            .unwrap_err();
        assert!(matches!(err, FormatError::InvalidRange { start: 2, end: 1, .. }));
        assert!(slot.formats().is_empty());
    }

    #[test]
    fn test_cut() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let align = registry.find("align").unwrap();
        let mut slot = Slot::from_text("0123456789");
        slot.apply_format(bold, 2, 8, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();
        slot.apply_format(align, 0, 0, FormatRule::Set(FormatValue::str("center")))
            .unwrap();

        let piece = slot.cut(5, 9).unwrap();

        assert_eq!(piece.text(), "5678");
        assert_eq!(piece.formats().get(bold).unwrap(), &[FormatRange::new(0, 3, true)]);
        assert_eq!(piece.formats().get(align).unwrap(), &[FormatRange::new(0, 4, "center")]);

        assert_eq!(slot.text(), "012349");
        assert_eq!(slot.formats().get(bold).unwrap(), &[FormatRange::new(2, 5, true)]);
        assert_eq!(slot.formats().get(align).unwrap(), &[FormatRange::new(0, 6, "center")]);
    }

    #[test]
    fn test_json_round_trip() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("hello");
        slot.apply_format(bold, 0, 2, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        let json = serde_json::to_string(&slot.to_json()).unwrap();
        let parsed: SlotJson = serde_json::from_str(&json).unwrap();
        let restored = Slot::from_json(&registry, &parsed).unwrap();

        assert_eq!(restored.text(), "hello");
        assert_eq!(restored.to_json(), slot.to_json());
    }

    #[test]
    fn test_to_tree_covers_slot() {
        let registry = registry();
        let bold = registry.find("bold").unwrap();
        let mut slot = Slot::from_text("hello world");
        slot.apply_format(bold, 6, 11, FormatRule::Set(FormatValue::bool(true)))
            .unwrap();

        let tree = slot.to_tree();
        assert_eq!(tree.leaves(), vec![(0, 6), (6, 11)]);
    }
}
