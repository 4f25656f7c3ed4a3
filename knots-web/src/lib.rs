//! Knots Web - WASM entry point for the browser viewer
//!
//! Appends a full-window canvas to the page, starts both knot downloads,
//! wires touch and resize events to the session and runs the frame loop.

pub mod renderer;

#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod logging;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    use knots_core::Session;
    use renderer::GlRenderer;
    use std::cell::RefCell;
    use std::rc::Rc;

    logging::init_logging(logging::LoggingConfig::default());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    body.append_child(&canvas)?;

    let (width, height) = events::window_size(&window)?;
    let renderer = GlRenderer::new(canvas.clone())?;
    let session = Rc::new(RefCell::new(Session::new(renderer, width, height)));

    fetch::spawn_loads(session.clone());
    events::attach(&session, &canvas, &window)?;
    events::start_render_loop(&session, &window)?;

    log::info!("viewer started at {width}x{height}");
    Ok(())
}
