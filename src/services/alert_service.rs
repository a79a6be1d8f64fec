// ============================================================================
// ALERT SERVICE - Alertas temporales de Bootstrap en #alerts-container
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;

use crate::config::CONFIG;
use crate::dom::{get_element_by_id, append_child, ElementBuilder};

const ALERTS_CONTAINER_ID: &str = "alerts-container";

/// Nivel visual de la alerta (clase `alert-*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Danger,
    Warning,
    Info,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Destino de los mensajes al usuario
pub trait AlertSink {
    fn show(&self, message: &str, level: AlertLevel);
}

/// Alertas reales en el DOM, auto-descartadas tras `alert_duration_ms`
#[derive(Clone, Copy, Default)]
pub struct DomAlertSink;

impl DomAlertSink {
    fn render(message: &str, level: AlertLevel) -> Result<(), JsValue> {
        let Some(container) = get_element_by_id(ALERTS_CONTAINER_ID) else {
            // Páginas sin contenedor (login): solo consola
            log::warn!("⚠️ [ALERT] Sin #{}: {}", ALERTS_CONTAINER_ID, message);
            return Ok(());
        };

        let alert_id = format!("alert-{}", uuid::Uuid::new_v4());
        let close = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn-close")
            .attr("data-bs-dismiss", "alert")?
            .attr("aria-label", "Close")?
            .build();
        let alert = ElementBuilder::new("div")?
            .id(&alert_id)?
            .class(&format!("alert alert-{} alert-dismissible fade show", level.as_str()))
            .attr("role", "alert")?
            .text(message)
            .child(close)?
            .build();
        append_child(&container, &alert)?;

        Timeout::new(CONFIG.alert_duration_ms, move || {
            if let Some(el) = get_element_by_id(&alert_id) {
                el.remove();
            }
        })
        .forget();
        Ok(())
    }
}

impl AlertSink for DomAlertSink {
    fn show(&self, message: &str, level: AlertLevel) {
        log::info!("🔔 [ALERT] ({}) {}", level.as_str(), message);
        if let Err(e) = Self::render(message, level) {
            log::error!("❌ [ALERT] No se pudo mostrar la alerta: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_bootstrap_classes() {
        assert_eq!(AlertLevel::Success.as_str(), "success");
        assert_eq!(AlertLevel::Danger.as_str(), "danger");
        assert_eq!(AlertLevel::Warning.as_str(), "warning");
        assert_eq!(AlertLevel::Info.as_str(), "info");
    }
}
