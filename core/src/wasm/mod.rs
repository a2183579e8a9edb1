//! WASM bindings for FormatKit
//!
//! This module provides JavaScript-friendly bindings around a [`Slot`](crate::slot::Slot)
//! and its formatter registry. Values, trees and snapshots cross the
//! boundary as JSON strings.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::WasmSlot;
