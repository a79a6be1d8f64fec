use gloo_timers::callback::Timeout;

/// Navegación de página completa (las páginas las renderiza el servidor)
pub trait Navigator {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
    /// Navegar tras un retraso visible para el usuario
    fn navigate_after(&self, path: &str, delay_ms: u32);
}

/// Navegación real vía `window.location`
#[derive(Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, path: &str) {
        log::info!("🔀 [NAV] → {}", path);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                log::error!("❌ [NAV] No se pudo navegar a {}: {:?}", path, e);
            }
        }
    }

    fn navigate_after(&self, path: &str, delay_ms: u32) {
        let path = path.to_string();
        Timeout::new(delay_ms, move || BrowserNavigator.navigate(&path)).forget();
    }
}
