//! WASM API exports for JavaScript interop
//!
//! This module provides `#[wasm_bindgen]` exports for mounting chart
//! showcases from JavaScript. It is only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use parking_lot::Mutex;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::core::{Chart, Showcase};
use crate::runtime::run_showcase;

/// JavaScript-accessible showcase wrapper
#[wasm_bindgen]
pub struct JsShowcase {
    /// The showcase data
    showcase: Arc<Mutex<Showcase>>,
    /// Canvas ID for rendering
    canvas_id: String,
    /// Whether the Bevy app has started
    started: bool,
}

#[wasm_bindgen]
impl JsShowcase {
    /// Create a new JsShowcase from JSON
    ///
    /// # Arguments
    /// * `json` - JSON string representing the Showcase
    /// * `canvas_id` - HTML canvas element ID (without #)
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, canvas_id: &str) -> Result<JsShowcase, JsValue> {
        let showcase = Showcase::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse showcase JSON: {}", e)))?;

        Ok(JsShowcase {
            showcase: Arc::new(Mutex::new(showcase)),
            canvas_id: canvas_id.to_string(),
            started: false,
        })
    }

    /// Start the Bevy render loop
    ///
    /// This should only be called once.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        if self.started {
            web_sys::console::warn_1(&"Showcase already started".into());
            return;
        }

        let showcase = self.showcase.lock().clone();
        self.started = true;

        run_showcase(showcase, &self.canvas_id);
    }

    /// Replace the entire showcase
    ///
    /// Note: This currently requires recreating the Bevy app.
    #[wasm_bindgen]
    pub fn set_showcase(&mut self, json: &str) -> Result<(), JsValue> {
        let showcase = Showcase::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse showcase JSON: {}", e)))?;

        *self.showcase.lock() = showcase;

        web_sys::console::log_1(&"Showcase updated (requires restart to take effect)".into());

        Ok(())
    }

    /// Replace one chart by ID
    #[wasm_bindgen]
    pub fn update_chart(&mut self, chart_id: u64, json: &str) -> Result<(), JsValue> {
        let new_chart: Chart = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse chart JSON: {}", e)))?;

        let mut showcase = self.showcase.lock();
        for chart in showcase.charts.iter_mut() {
            if chart.id().0 == chart_id {
                *chart = new_chart;
                return Ok(());
            }
        }

        Err(JsValue::from_str(&format!("Chart {} not found", chart_id)))
    }

    /// Get the current showcase as JSON
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.showcase
            .lock()
            .to_json()
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize showcase: {}", e)))
    }

    /// Chart IDs in display order, for targeting `update_chart`
    #[wasm_bindgen]
    pub fn chart_ids(&self) -> js_sys::Array {
        self.showcase
            .lock()
            .charts
            .iter()
            .map(|c| JsValue::from_f64(c.id().0 as f64))
            .collect()
    }

    /// Get the canvas ID
    #[wasm_bindgen(getter)]
    pub fn canvas_id(&self) -> String {
        self.canvas_id.clone()
    }

    /// Check if the showcase has been started
    #[wasm_bindgen(getter)]
    pub fn is_started(&self) -> bool {
        self.started
    }
}
