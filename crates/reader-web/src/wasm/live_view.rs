use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The `this` of a LiveView client hook callback.
    #[derive(Debug, Clone)]
    pub type LiveViewHook;

    /// Element the hook is attached to (`phx-hook`).
    #[wasm_bindgen(method, getter)]
    pub fn el(this: &LiveViewHook) -> web_sys::Element;

    #[wasm_bindgen(method, js_name = pushEvent)]
    pub fn push_event(this: &LiveViewHook, event: &str, payload: &JsValue);

    /// Returns a reference for [`LiveViewHook::remove_handle_event`].
    #[wasm_bindgen(method, js_name = handleEvent)]
    pub fn handle_event(this: &LiveViewHook, event: &str, callback: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(method, js_name = removeHandleEvent)]
    pub fn remove_handle_event(this: &LiveViewHook, reference: &JsValue);
}
