//! WASM API module for browser/JS interop
//!
//! Exposes the backdrop as a JS class that paints into an RGBA buffer the
//! host blits onto its canvas once per animation frame.

use wasm_bindgen::prelude::*;

use crate::feed::{document, FeedKind};
use crate::field::ParticleField;
use crate::models::DisasterMode;
use crate::raster::RasterSurface;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn parse_mode(mode: &str) -> Result<DisasterMode, JsValue> {
    mode.parse::<DisasterMode>().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Animated disaster backdrop.
///
/// Dropping the JS object (`free()`) releases the field; nothing keeps
/// running afterwards since frames are only painted on `frame()` calls.
#[wasm_bindgen]
pub struct Backdrop {
    field: ParticleField,
    surface: RasterSurface,
}

#[wasm_bindgen]
impl Backdrop {
    /// Create a backdrop. Without a seed the field is seeded from the
    /// browser's entropy source.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str, width: u32, height: u32, seed: Option<u64>) -> Result<Backdrop, JsValue> {
        let mode = parse_mode(mode)?;
        let field = match seed {
            Some(seed) => ParticleField::seeded(mode, width, height, seed),
            None => ParticleField::new(mode, width, height),
        };
        Ok(Backdrop { field, surface: RasterSurface::new(width, height) })
    }

    /// Switch disaster mode; the field respawns if the mode changed.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        self.field.set_mode(parse_mode(mode)?);
        Ok(())
    }

    /// Follow a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.field.resize(width, height);
    }

    /// Advance one frame and return the RGBA pixels (4 bytes per pixel).
    pub fn frame(&mut self) -> Vec<u8> {
        self.field.frame(&mut self.surface);
        self.surface.pixels()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.field.dimensions().0
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.field.dimensions().1
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.field.mode().to_string()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.field.len()
    }
}

/// Feed document as a JSON string: "alerts", "quizzes", "stats",
/// "sessions" or "ping".
#[wasm_bindgen(js_name = feedJson)]
pub fn feed_json(kind: &str) -> Result<String, JsValue> {
    use clap::ValueEnum;

    let kind = FeedKind::from_str(kind, true).map_err(|e| JsValue::from_str(&e))?;
    let doc = document(kind, chrono::Utc::now());
    serde_json::to_string(&doc).map_err(|e| JsValue::from_str(&e.to_string()))
}
