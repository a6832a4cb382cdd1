//! Truth or Dare WASM Frontend
//!
//! Browser client that runs the whole game locally. Progress is kept in
//! localStorage; there is no server.

#![cfg(target_arch = "wasm32")]

mod app;
mod panels;
mod storage;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn find_canvas() -> Result<web_sys::HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("No canvas element"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Canvas is not HtmlCanvasElement"))
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize tracing for WASM
    tracing_wasm::set_as_global_default();

    let canvas = find_canvas()?;
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| {
                    let mut fonts = egui::FontDefinitions::default();
                    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
                    cc.egui_ctx.set_fonts(fonts);
                    Ok(Box::new(app::TruthOrDareApp::new()))
                }),
            )
            .await;
        if let Err(e) = started {
            tracing::error!("Failed to start eframe: {:?}", e);
        }
    });
    Ok(())
}
