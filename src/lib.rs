// ============================================================================
// BOT MARKET ADMIN - CONSOLA DE ADMINISTRACIÓN (RUST + WASM)
// ============================================================================
// Arquitectura MVVM sobre las páginas renderizadas por el servidor:
// - Views: enlazan el DOM existente (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API y adaptadores del navegador
// - State: contexto de sesión, secuenciación y estado de widgets
// - Models: Estructuras compartidas con backend
// ============================================================================

mod config;
mod models;
mod services;
mod viewmodels;
mod state;
mod dom;
mod views;
mod utils;
mod app;

#[cfg(test)]
mod testing;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;

// Instancia global de la app para los callbacks llamados desde JavaScript
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() { log::Level::Info } else { log::Level::Warn };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 Bot Market Admin ({})", CONFIG.environment);

    let mut app = App::new();
    if !app.start()? {
        // El guard ya está navegando a otra página
        return Ok(());
    }

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Guarda el token y navega (por defecto al dashboard). Llamable desde las plantillas
#[wasm_bindgen(js_name = saveAuthToken)]
pub fn save_auth_token(token: String, redirect: Option<String>) {
    APP.with(|cell| match cell.borrow().as_ref() {
        Some(app) => {
            if let Err(e) = app.state().session.save_auth_token(&token, redirect.as_deref()) {
                log::error!("❌ [GUARD] {}", e);
            }
        }
        None => log::warn!("⚠️ [GUARD] saveAuthToken antes de inicializar la app"),
    });
}

/// Cierra la sesión y vuelve al login
#[wasm_bindgen]
pub fn logout() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow().as_ref() {
            app.state().session.logout();
        }
    });
}
