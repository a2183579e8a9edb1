//! Formatter registry: capability descriptors for formatting attributes
//!
//! A [`Formatter`] describes one kind of attribute (bold, link, column
//! style, ...) together with the policy the range store applies when
//! merging it. Formatters are created once at editor setup through a
//! [`FormatterRegistry`] and shared as `Arc<Formatter>` for the rest of the
//! process.
//!
//! # Identity
//!
//! Formatters are compared by their [`FormatterId`], never by name. Two
//! registrations named `"bold"` are two different formatters, and the range
//! store keeps their ranges apart.
//!
//! # Example
//!
//! ```rust
//! use formatkit_core::formatter::{FormatScope, FormatterConfig, FormatterRegistry};
//!
//! let mut registry = FormatterRegistry::new();
//! let bold = registry.register(FormatterConfig::inline("bold"));
//! let align = registry.register(FormatterConfig::block("align"));
//!
//! assert_eq!(bold.scope, FormatScope::Inline);
//! assert_eq!(align.scope, FormatScope::Block);
//! assert_ne!(bold, align);
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Where a formatter applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatScope {
    /// Applies to the whole slot
    Block,
    /// Applies to arbitrary sub-ranges of the slot
    Inline,
}

/// Stable handle of a registered formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatterId(pub u32);

impl fmt::Display for FormatterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability descriptor of one attribute kind
///
/// Pure data. The range store reads `scope` and `overlap` to pick a merge
/// strategy; the tree builder reads `columned`.
#[derive(Debug, Clone, Serialize)]
pub struct Formatter {
    pub id: FormatterId,
    pub name: String,
    pub scope: FormatScope,
    /// Distinct values may cover the same offsets at once
    pub overlap: bool,
    /// Whole-width values are re-applied to every split-off child
    pub columned: bool,
}

impl Formatter {
    pub fn is_block(&self) -> bool {
        self.scope == FormatScope::Block
    }

    pub fn is_inline(&self) -> bool {
        self.scope == FormatScope::Inline
    }
}

impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Formatter {}

impl Hash for Formatter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Formatter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Formatter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Configuration for registering a formatter
///
/// Deserializes from `{"name": "bold", "scope": "inline"}`; `overlap` and
/// `columned` default to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub name: String,
    pub scope: FormatScope,
    #[serde(default)]
    pub overlap: bool,
    #[serde(default)]
    pub columned: bool,
}

impl FormatterConfig {
    pub fn inline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: FormatScope::Inline,
            overlap: false,
            columned: false,
        }
    }

    pub fn block(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: FormatScope::Block,
            overlap: false,
            columned: false,
        }
    }

    pub fn overlap(mut self, overlap: bool) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn columned(mut self, columned: bool) -> Self {
        self.columned = columned;
        self
    }
}

/// Registry handing out formatters with stable ids
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: Vec<Arc<Formatter>>,
}

impl FormatterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of [`FormatterConfig`]s
    ///
    /// Formatters receive ids in array order.
    pub fn from_json(json: &str) -> Result<Self> {
        let configs: Vec<FormatterConfig> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for config in configs {
            registry.register(config);
        }
        Ok(registry)
    }

    /// Register a new formatter and return its shared handle
    pub fn register(&mut self, config: FormatterConfig) -> Arc<Formatter> {
        let id = FormatterId(self.formatters.len() as u32);
        let formatter = Arc::new(Formatter {
            id,
            name: config.name,
            scope: config.scope,
            overlap: config.overlap,
            columned: config.columned,
        });
        log::debug!("registered formatter {} ({})", formatter.name, id);
        self.formatters.push(Arc::clone(&formatter));
        formatter
    }

    /// Look up a formatter by id
    pub fn get(&self, id: FormatterId) -> Option<&Arc<Formatter>> {
        self.formatters.get(id.0 as usize)
    }

    /// Look up a formatter by name
    ///
    /// Names are not unique; the earliest registration wins.
    pub fn find(&self, name: &str) -> Option<&Arc<Formatter>> {
        self.formatters.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Formatter>> {
        self.formatters.iter()
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = FormatterRegistry::new();
        let bold = registry.register(FormatterConfig::inline("bold"));
        let italic = registry.register(FormatterConfig::inline("italic"));

        assert_eq!(bold.id, FormatterId(0));
        assert_eq!(italic.id, FormatterId(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(FormatterId(1)), Some(&italic));
    }

    #[test]
    fn test_same_name_is_distinct_formatter() {
        let mut registry = FormatterRegistry::new();
        let first = registry.register(FormatterConfig::inline("bold"));
        let second = registry.register(FormatterConfig::inline("bold"));

        assert_ne!(first, second);
        assert_eq!(registry.find("bold"), Some(&first));
    }

    #[test]
    fn test_from_json() {
        let registry = FormatterRegistry::from_json(
            r#"[
                {"name": "bold", "scope": "inline"},
                {"name": "comment", "scope": "inline", "overlap": true},
                {"name": "cellStyle", "scope": "block", "overlap": true},
                {"name": "column", "scope": "inline", "columned": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 4);
        let comment = registry.find("comment").unwrap();
        assert!(comment.overlap);
        assert!(comment.is_inline());
        assert!(registry.find("cellStyle").unwrap().is_block());
        assert!(registry.find("column").unwrap().columned);
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn test_from_json_rejects_unknown_scope() {
        let result = FormatterRegistry::from_json(r#"[{"name": "x", "scope": "row"}]"#);
        assert!(result.is_err());
    }
}
