//! Wave Cloud - animated point-cloud surface over WebSocket
//!
//! A grid of points whose heights follow `sin(x·ω + t)·cos(y·ω + t) + offset`.
//! The server either streams every frame (server-driven) or sends the scene
//! once and lets the renderer animate it (client-driven).
//!
//! - `core`: grid, field sampler, clock, config and wire protocol
//! - `renderer`: renderer boundary, point buffer, orbit camera, local frame loop
//! - `animator`: server/client animators and the latest-wins handover
//! - `server`: per-connection WebSocket sessions (`cli` feature)
//! - browser viewer: eframe app (`wasm` feature, wasm32 only)

pub mod animator;
pub mod core;
pub mod renderer;
pub mod time;
pub mod ws_state;

#[cfg(feature = "cli")]
pub mod server;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod theme;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod viewer;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod websocket_wasm;

/// Default server URL for renderers (override with WAVE_WS env var)
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:38090";

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::viewer::WaveViewer;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async {
            let Some(canvas) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("canvas"))
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            else {
                tracing::error!("No <canvas id=\"canvas\"> element");
                return;
            };

            if let Err(e) = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(WaveViewer::new(cc)))),
                )
                .await
            {
                tracing::error!(?e, "Failed to start eframe");
            }
        });
    }
}
