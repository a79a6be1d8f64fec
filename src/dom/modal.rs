// ============================================================================
// MODAL FFI - Modales de Bootstrap de las plantillas
// ============================================================================
// Solo wrappers para funciones JS - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

fn modal_call(id: &str, action: &str) {
    if let Some(window) = web_sys::window() {
        let function = js_sys::Function::new_with_args(
            "id, action",
            "var el = document.getElementById(id); if (!el) return; \
             if (window.bootstrap && bootstrap.Modal) { bootstrap.Modal.getOrCreateInstance(el)[action](); } \
             else if (window.jQuery) { jQuery(el).modal(action); }",
        );
        if let Err(e) = function.call2(&window.into(), &JsValue::from_str(id), &JsValue::from_str(action)) {
            log::error!("❌ [MODAL] {} #{}: {:?}", action, id, e);
        }
    }
}

pub fn show_modal(id: &str) {
    modal_call(id, "show");
}

pub fn hide_modal(id: &str) {
    modal_call(id, "hide");
}
