//! Formatting-range index for a single slot
//!
//! This module associates formatters with offset ranges inside a slot,
//! keeps those ranges consistent across insertions and deletions, and turns
//! them into a well-nested [`FormatTree`] for rendering.
//!
//! # Components
//!
//! - **range**: [`FormatRange`] plus the dense tiling primitives
//!   [`tile_ranges`] and [`to_ranges`]
//! - **store**: [`RangeStore`] and its four merge strategies
//! - **edit**: stretch / split / shrink edit propagation and extraction
//! - **views**: grid, array, JSON and per-offset queries
//! - **tree**: overlap-to-tree decomposition
//!
//! # Concurrency
//!
//! Everything here is synchronous. A store belongs to one slot and must be
//! mutated by a single editing session at a time; wrap the owning slot in a
//! mutex if several threads can reach it. Extracted stores and views are
//! independent copies.

mod edit;
mod range;
mod store;
mod tree;
mod views;

pub use range::{tile_ranges, to_ranges, FormatRange};
pub use store::{FormatItem, RangeStore};
pub use tree::FormatTree;
pub use views::FormatsJson;
