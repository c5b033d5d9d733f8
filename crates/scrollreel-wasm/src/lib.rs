//! # scrollreel-wasm
//!
//! WebAssembly bindings for the scrollreel engine.
//! The page measures itself and forwards scroll events; frame loading and
//! painting stay in JavaScript.

mod engine;

pub use engine::WasmEngine;

use scrollreel_core::{PageLayout, ReelConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    /// Engine instance for the main WASM thread; `None` until [`init`].
    static ENGINE: std::cell::RefCell<Option<WasmEngine>> = const { std::cell::RefCell::new(None) };
}

fn with_engine<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&mut WasmEngine) -> R,
{
    ENGINE.with(|e| match e.borrow_mut().as_mut() {
        Some(engine) => Ok(f(engine)),
        None => Err(JsValue::from_str("scrollreel is not initialized; call init() first")),
    })
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize (or re-initialize) the engine from TOML. An empty string
/// uses the defaults.
#[wasm_bindgen]
pub fn init(config_toml: &str) -> Result<(), JsValue> {
    let config = if config_toml.trim().is_empty() {
        ReelConfig::default()
    } else {
        ReelConfig::from_toml(config_toml).map_err(js_err)?
    };
    let engine = WasmEngine::new(config).map_err(js_err)?;
    ENGINE.with(|e| *e.borrow_mut() = Some(engine));
    Ok(())
}

/// Location string of a 1-based frame index.
#[wasm_bindgen]
pub fn resolve_frame(index: i32) -> Result<String, JsValue> {
    with_engine(|e| e.resolve(i64::from(index)).map(|l| l.to_string()))?.map_err(js_err)
}

/// Prefetch plan as JSON: `{ immediate: [..], deferred: [..], delay_ms }`.
#[wasm_bindgen]
pub fn prefetch_plan() -> Result<String, JsValue> {
    with_engine(|e| serde_json::to_string(&e.prefetch_plan()))?.map_err(js_err)
}

/// Report freshly measured page geometry (call on load and after every resize).
///
/// Returns the new frame if it changed.
#[wasm_bindgen]
pub fn set_layout(layout_json: &str) -> Result<Option<u32>, JsValue> {
    let layout: PageLayout = serde_json::from_str(layout_json).map_err(js_err)?;
    with_engine(|e| e.set_layout(layout).map(|f| f.get()))
}

/// Scroll notification. Returns the new frame if it changed.
#[wasm_bindgen]
pub fn on_scroll(offset: f64) -> Result<Option<u32>, JsValue> {
    with_engine(|e| e.on_scroll(offset).map(|f| f.get()))
}

/// Animation-frame callback, `dt` in seconds. Only matters with a scrub lag.
#[wasm_bindgen]
pub fn tick(dt: f64) -> Result<Option<u32>, JsValue> {
    with_engine(|e| e.tick(dt).map(|f| f.get()))
}

#[wasm_bindgen]
pub fn current_frame() -> Result<u32, JsValue> {
    with_engine(|e| e.current_frame().get())
}

/// Section transforms as a JSON array of `{ opacity, scale }`.
#[wasm_bindgen]
pub fn section_transforms() -> Result<String, JsValue> {
    with_engine(|e| serde_json::to_string(&e.section_transforms()))?.map_err(js_err)
}

/// Background and overlay opacity as JSON.
#[wasm_bindgen]
pub fn surface_style() -> Result<String, JsValue> {
    with_engine(|e| serde_json::to_string(&e.config().surface))?.map_err(js_err)
}

/// Get the version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
