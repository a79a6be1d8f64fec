// ============================================================================
// NAV VIEW - Menú lateral: item activo, toggle del sidebar y logout
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use crate::dom::{add_class, get_element_by_id, on_click, toggle_class};
use crate::state::SessionContext;
use crate::utils::constants::DASHBOARD_ROUTE;

/// ID del item de menú que corresponde a la ruta
pub fn active_nav_id(path: &str) -> Option<&'static str> {
    if path == DASHBOARD_ROUTE {
        Some("nav-dashboard")
    } else if path.starts_with("/bots") {
        if path.contains("/categories") {
            Some("nav-categories")
        } else {
            Some("nav-bots")
        }
    } else if path.starts_with("/users") {
        Some("nav-users")
    } else if path.starts_with("/payments") {
        Some("nav-payments")
    } else if path.starts_with("/reports") {
        Some("nav-reports")
    } else if path.starts_with("/changelogs") {
        Some("nav-changelogs")
    } else {
        None
    }
}

/// Montar el chrome de navegación presente en la página
pub fn mount_nav(session: Rc<SessionContext>) -> Result<(), JsValue> {
    if let Some(item) = active_nav_id(&session.current_path()).and_then(get_element_by_id) {
        add_class(&item, "active")?;
    }

    if let Some(toggle) = get_element_by_id("menu-toggle") {
        on_click(&toggle, |e: MouseEvent| {
            e.prevent_default();
            if let Some(wrapper) = get_element_by_id("wrapper") {
                let _ = toggle_class(&wrapper, "toggled");
            }
        })?;
    }

    if let Some(logout) = get_element_by_id("logout-btn") {
        on_click(&logout, move |e: MouseEvent| {
            e.prevent_default();
            session.logout();
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_highlighting() {
        assert_eq!(active_nav_id("/dashboard"), Some("nav-dashboard"));
        assert_eq!(active_nav_id("/bots/page"), Some("nav-bots"));
        assert_eq!(active_nav_id("/bots/categories/page"), Some("nav-categories"));
        assert_eq!(active_nav_id("/users/12"), Some("nav-users"));
        assert_eq!(active_nav_id("/payments"), Some("nav-payments"));
        assert_eq!(active_nav_id("/reports/page"), Some("nav-reports"));
        assert_eq!(active_nav_id("/changelogs"), Some("nav-changelogs"));
        assert_eq!(active_nav_id("/"), None);
    }
}
