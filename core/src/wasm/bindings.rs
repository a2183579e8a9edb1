//! JavaScript bindings for FormatKit core types

use crate::error::FormatError;
use crate::formatter::FormatterRegistry;
use crate::slot::{Slot, SlotJson};
use crate::value::{FormatRule, FormatValue};
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript-friendly wrapper for a formatted slot
#[wasm_bindgen]
pub struct WasmSlot {
    registry: FormatterRegistry,
    inner: Slot,
}

#[wasm_bindgen]
impl WasmSlot {
    /// Create a slot holding `text`
    ///
    /// `formatters_json` is a JSON array of formatter configs, e.g.
    /// `[{"name": "bold", "scope": "inline"}]`.
    #[wasm_bindgen(constructor)]
    pub fn new(formatters_json: String, text: String) -> Result<WasmSlot, JsValue> {
        let registry = FormatterRegistry::from_json(&formatters_json).map_err(js_error)?;
        Ok(Self {
            registry,
            inner: Slot::from_text(&text),
        })
    }

    /// Restore a slot from `toJSON` output
    #[wasm_bindgen(js_name = fromJSON)]
    pub fn from_json(formatters_json: String, slot_json: String) -> Result<WasmSlot, JsValue> {
        let registry = FormatterRegistry::from_json(&formatters_json).map_err(js_error)?;
        let json: SlotJson = serde_json::from_str(&slot_json).map_err(js_error)?;
        let inner = Slot::from_json(&registry, &json).map_err(js_error)?;
        Ok(Self { registry, inner })
    }

    /// Length in chars
    #[wasm_bindgen(js_name = length)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Current text content
    #[wasm_bindgen(js_name = text)]
    pub fn text(&self) -> String {
        self.inner.text()
    }

    /// Insert text, inheriting the surrounding formatting
    #[wasm_bindgen(js_name = insert)]
    pub fn insert(&mut self, index: usize, text: String) -> Result<(), JsValue> {
        self.inner.insert(index, &text, &[]).map_err(js_error)
    }

    /// Delete `count` chars at `index`
    #[wasm_bindgen(js_name = deleteText)]
    pub fn delete(&mut self, index: usize, count: usize) -> Result<(), JsValue> {
        self.inner.delete(index, count).map_err(js_error)
    }

    /// Set a formatter's value over a range (pass JSON for value, `null` to remove)
    #[wasm_bindgen(js_name = format)]
    pub fn format(
        &mut self,
        name: String,
        start: usize,
        end: usize,
        value_json: String,
    ) -> Result<(), JsValue> {
        let value: Option<FormatValue> = serde_json::from_str(&value_json).map_err(js_error)?;
        self.apply(&name, start, end, FormatRule::from(value))
    }

    /// Unset a formatter only where it carries the given value
    #[wasm_bindgen(js_name = clean)]
    pub fn clean(
        &mut self,
        name: String,
        start: usize,
        end: usize,
        value_json: String,
    ) -> Result<(), JsValue> {
        let value: Option<FormatValue> = serde_json::from_str(&value_json).map_err(js_error)?;
        self.apply(&name, start, end, FormatRule::Clean(value))
    }

    /// Export slot as JSON string
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.to_json()).map_err(js_error)
    }

    /// Export the format tree of the whole slot as JSON string
    #[wasm_bindgen(js_name = toTree)]
    pub fn to_tree(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.to_tree()).map_err(js_error)
    }

    /// Run boundaries as an array of offsets
    #[wasm_bindgen(js_name = toGrid)]
    pub fn to_grid(&self) -> Vec<u32> {
        self.inner
            .formats()
            .to_grid()
            .into_iter()
            .map(|offset| offset as u32)
            .collect()
    }
}

impl WasmSlot {
    fn apply(&mut self, name: &str, start: usize, end: usize, rule: FormatRule) -> Result<(), JsValue> {
        let formatter = self
            .registry
            .find(name)
            .cloned()
            .ok_or_else(|| js_error(FormatError::UnknownFormatter(name.to_string())))?;
        self.inner
            .apply_format(&formatter, start, end, rule)
            .map_err(js_error)
    }
}
