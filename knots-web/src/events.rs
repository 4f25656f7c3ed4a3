//! Browser event wiring: touch input, window resize and the frame loop.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, TouchEvent, Window};

use knots_core::{RenderTarget, Session, TouchPoint};

type Shared<R> = Rc<RefCell<Session<R>>>;

/// Client coordinates of every point in the event's `touches` list
pub fn touch_points(event: &TouchEvent) -> Vec<TouchPoint> {
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| TouchPoint::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

/// Current inner size of the window in CSS pixels
pub fn window_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as u32, height as u32))
}

/// Register touch listeners on the canvas and the resize listener on the
/// window. The listeners live for the rest of the page.
pub fn attach<R: RenderTarget + 'static>(
    session: &Shared<R>,
    canvas: &HtmlCanvasElement,
    window: &Window,
) -> Result<(), JsValue> {
    let touch_start_cb = {
        let session = session.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            session.borrow_mut().touch_start(&touch_points(&e));
        }) as Box<dyn FnMut(_)>)
    };
    canvas.add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref())?;

    let touch_move_cb = {
        let session = session.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            session.borrow_mut().touch_move(&touch_points(&e));
        }) as Box<dyn FnMut(_)>)
    };
    canvas.add_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref())?;

    let touch_end_cb = {
        let session = session.clone();
        Closure::wrap(Box::new(move |_e: TouchEvent| {
            session.borrow_mut().touch_end();
        }) as Box<dyn FnMut(_)>)
    };
    canvas.add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref())?;

    let resize_cb = {
        let session = session.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |_e: web_sys::Event| match window_size(&window) {
            Ok((width, height)) => session.borrow_mut().resize(width, height),
            Err(e) => log::warn!("could not read window size: {:?}", e),
        }) as Box<dyn FnMut(_)>)
    };
    window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;

    touch_start_cb.forget();
    touch_move_cb.forget();
    touch_end_cb.forget();
    resize_cb.forget();
    Ok(())
}

/// Draw a frame on every animation frame, forever
pub fn start_render_loop<R: RenderTarget + 'static>(
    session: &Shared<R>,
    window: &Window,
) -> Result<(), JsValue> {
    let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let closure_cell_loop = closure_cell.clone();
    let session = session.clone();
    let window_loop = window.clone();

    *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        session.borrow_mut().render_frame();
        if let Some(next) = closure_cell_loop.borrow().as_ref() {
            if let Err(e) = window_loop.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(first) = closure_cell.borrow().as_ref() {
        window.request_animation_frame(first.as_ref().unchecked_ref())?;
    }
    Ok(())
}
