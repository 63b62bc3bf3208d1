//! WASM bindings for reprise-playback
//!
//! Adapters from browser APIs to the engine, timer and platform ports, and a
//! JavaScript-facing player built on them.

pub mod engine;
pub mod player;

pub use engine::{HtmlMediaEngine, JsPlatform, JsTimer};
pub use player::WasmPlayer;
