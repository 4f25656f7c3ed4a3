//! Asset loading over HTTP.
//!
//! Each knot is fetched by its own future: material file first, then the
//! geometry. The two futures share nothing and may finish in either order.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

use knots_core::{loader, LoadError, LoadResult, Model, ModelSource, RenderTarget, Session, MODEL_SOURCES};

/// Start both loads. Each result is handed to the session when it arrives.
pub fn spawn_loads<R: RenderTarget + 'static>(session: Rc<RefCell<Session<R>>>) {
    for source in MODEL_SOURCES {
        let session = session.clone();
        spawn_local(async move {
            let result = load_model(&source).await;
            session.borrow_mut().model_loaded(source.side, result);
        });
    }
}

async fn load_model(source: &ModelSource) -> LoadResult<Model> {
    let material_text = fetch_text(source.material_path).await?;
    let geometry_text = fetch_text(source.geometry_path).await?;
    loader::build_model(source, &material_text, &geometry_text)
}

async fn fetch_text(path: &str) -> LoadResult<String> {
    let fetch_err = |e: JsValue| LoadError::Fetch {
        path: path.to_string(),
        message: format!("{:?}", e),
    };

    let win = web_sys::window().ok_or_else(|| LoadError::Fetch {
        path: path.to_string(),
        message: "no window".to_string(),
    })?;
    let resp_val = JsFuture::from(win.fetch_with_str(path))
        .await
        .map_err(fetch_err)?;
    let resp: web_sys::Response = resp_val.dyn_into().map_err(fetch_err)?;

    if !resp.ok() {
        return Err(LoadError::Fetch {
            path: path.to_string(),
            message: format!("HTTP {} {}", resp.status(), resp.status_text()),
        });
    }

    let text_promise = resp.text().map_err(fetch_err)?;
    let text_val = JsFuture::from(text_promise).await.map_err(fetch_err)?;
    text_val.as_string().ok_or_else(|| LoadError::Encoding {
        path: path.to_string(),
    })
}
