// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// GESTIÓN DE MEMORY LEAKS:
// - Para listeners en elementos del DOM: cuando el elemento se destruye (p.ej. con set_inner_html("")),
//   el navegador limpia los listeners asociados, así que closure.forget() es seguro.
// - Para listeners globales (window/document): solo deben registrarse UNA VEZ al montar la página.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, MouseEvent};

/// Registrar un listener genérico que vive lo mismo que la página
pub fn on_event<F>(target: &EventTarget, event_type: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    // Nota: closure.forget() es necesario para mantener el closure vivo en Rust WASM
    closure.forget();
    Ok(())
}

/// Helper para crear click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// `input` (cada pulsación)
pub fn on_input<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    on_event(element, "input", handler)
}

/// `change` (selects, radios, inputs de archivo)
pub fn on_change<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    on_event(element, "change", handler)
}

/// `submit` con preventDefault ya aplicado
pub fn on_submit<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    on_event(element, "submit", move |e: Event| {
        e.prevent_default();
        handler();
    })
}

/// Click delegado: se dispara para clicks dentro de `container` cuyo
/// objetivo (o un ancestro) cumple `selector`; recibe ese elemento
pub fn on_delegated_click<F>(container: &Element, selector: &str, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(Element) + 'static,
{
    let selector = selector.to_string();
    on_click(container, move |e: MouseEvent| {
        let matched = e
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten());
        if let Some(el) = matched {
            handler(el);
        }
    })
}
