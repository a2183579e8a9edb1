//! FormatKit Core - Formatting-range index for rich-text slots
//!
//! This is the Rust core of FormatKit, compiled to both native and WASM.
//! It implements:
//! - Formatter capability descriptors and their registry
//! - A per-slot range store that merges, coalesces and tracks formatting
//!   across insertions and deletions
//! - Decomposition of overlapping ranges into a well-nested format tree
//! - Grid, flat and JSON views for interchange
//!
//! # Examples
//!
//! ```rust
//! use formatkit_core::{FormatRule, FormatValue, FormatterConfig, FormatterRegistry, RangeStore};
//!
//! let mut registry = FormatterRegistry::new();
//! let bold = registry.register(FormatterConfig::inline("bold"));
//!
//! let mut store = RangeStore::new(10);
//! store.merge(&bold, 2, 5, FormatRule::Set(FormatValue::bool(true)));
//! store.stretch(3, 1);
//!
//! assert_eq!(store.to_grid(), vec![0, 2, 6, 11]);
//! ```

pub mod error;
pub mod format;
pub mod formatter;
pub mod value;

#[cfg(feature = "slot")]
pub mod slot;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use error::{FormatError, Result};
pub use format::{FormatItem, FormatRange, FormatTree, FormatsJson, RangeStore};
pub use formatter::{FormatScope, Formatter, FormatterConfig, FormatterId, FormatterRegistry};
pub use value::{FormatRule, FormatValue, Scalar};

#[cfg(feature = "slot")]
pub use slot::Slot;
