// ============================================================================
// LOGIN VIEW - Puente con el widget de login de Telegram
// ============================================================================
// El widget llama a la función global `onTelegramAuth(user)` con el objeto
// de usuario firmado. La página de login solo existe en la ruta pública `/`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::models::TelegramAuthPayload;
use crate::services::errors::ApiError;
use crate::state::session_state::is_public_route;
use crate::viewmodels::SessionViewModel;

thread_local! {
    static LOGIN: RefCell<Option<Rc<SessionViewModel>>> = RefCell::new(None);
}

/// Payload del widget a partir de su JSON
pub fn decode_telegram_user(json: &str) -> Result<TelegramAuthPayload, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Deja el viewmodel listo para el callback del widget
pub fn mount_login(vm: Rc<SessionViewModel>, path: &str) -> bool {
    if !is_public_route(path) {
        return false;
    }
    LOGIN.with(|cell| *cell.borrow_mut() = Some(vm));
    log::info!("🔐 [AUTH] Esperando login de Telegram");
    true
}

#[wasm_bindgen(js_name = onTelegramAuth)]
pub fn on_telegram_auth(user: JsValue) {
    let json = match js_sys::JSON::stringify(&user) {
        Ok(json) => String::from(json),
        Err(e) => {
            log::error!("❌ [AUTH] Usuario de Telegram no serializable: {:?}", e);
            return;
        }
    };
    let payload = match decode_telegram_user(&json) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("❌ [AUTH] {}", e);
            return;
        }
    };
    let Some(vm) = LOGIN.with(|cell| cell.borrow().clone()) else {
        log::warn!("⚠️ [AUTH] onTelegramAuth fuera de la página de login");
        return;
    };
    spawn_local(async move {
        vm.telegram_login(payload).await;
    });
}
