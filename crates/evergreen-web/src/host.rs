//! Page integration: the canvas the renderer draws into

use wasm_bindgen::JsValue;

/// Make sure `#<id>` exists, creating it as the first element of the body
/// when the page does not provide one.
pub fn ensure_canvas(id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;

    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.set_attribute("style", "margin: 0; overflow: hidden;")?;

    let canvas = document.create_element("canvas")?;
    canvas.set_id(id);
    canvas.set_attribute("style", "display: block; width: 100vw; height: 100vh;")?;
    body.insert_before(&canvas, body.first_child().as_ref())?;

    tracing::debug!(id, "Created canvas");
    Ok(())
}
