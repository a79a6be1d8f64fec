// ============================================================================
// NOTIFICATIONS VIEW - Dropdown de notificaciones del header
// ============================================================================

use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, MouseEvent};

use crate::config::CONFIG;
use crate::dom::{append_child, get_element_by_id, on_click, set_text_content, set_visible, ElementBuilder};
use crate::models::{Notification, NotificationFeed};
use crate::utils::format::format_datetime;
use crate::viewmodels::NotificationViewModel;

const BADGE_ID: &str = "notifications-badge";
const LIST_ID: &str = "notifications-list";
const EMPTY_TEXT: &str = "Нет новых уведомлений";

fn render_item(notification: &Notification) -> Result<Element, JsValue> {
    let icon = ElementBuilder::new("i")?
        .class(&format!("fas {} text-white", notification.icon))
        .build();
    let circle = ElementBuilder::new("div")?
        .class(&format!("icon-circle {}", notification.badge().background_class()))
        .child(icon)?
        .build();
    let icon_column = ElementBuilder::new("div")?.class("me-3").child(circle)?.build();

    let date = ElementBuilder::new("div")?
        .class("small text-muted")
        .text(&format_datetime(&notification.created_at))
        .build();
    let title = ElementBuilder::new("span")?
        .class("fw-bold")
        .text(&notification.title)
        .build();
    let message = ElementBuilder::new("div")?
        .class("text-truncate")
        .attr("style", "max-width: 250px;")?
        .text(&notification.message)
        .build();
    let body = ElementBuilder::new("div")?.children([date, title, message])?.build();

    let item = ElementBuilder::new("a")?
        .attr("href", &notification.link)?
        .class("dropdown-item notification-item d-flex align-items-center py-2")
        .children([icon_column, body])?
        // Que el dropdown no se cierre al pulsar dentro
        .on_click(|e: MouseEvent| e.stop_propagation())?
        .build();
    Ok(item)
}

fn render(feed: &NotificationFeed) -> Result<(), JsValue> {
    if let Some(badge) = get_element_by_id(BADGE_ID) {
        if feed.unread_count > 0 {
            set_text_content(&badge, &feed.unread_count.to_string());
            set_visible(&badge, true);
        } else {
            set_visible(&badge, false);
        }
    }

    let Some(list) = get_element_by_id(LIST_ID) else {
        return Ok(());
    };
    list.set_inner_html("");
    if feed.notifications.is_empty() {
        let empty = ElementBuilder::new("div")?
            .class("text-center p-3 text-muted")
            .text(EMPTY_TEXT)
            .build();
        list.append_child(&empty)?;
        return Ok(());
    }
    for notification in &feed.notifications {
        append_child(&list, &render_item(notification)?)?;
    }
    Ok(())
}

/// Montar el dropdown si la página lo tiene. Arranca el polling
pub fn mount_notifications(vm: Rc<NotificationViewModel>) -> Result<bool, JsValue> {
    if get_element_by_id(BADGE_ID).is_none() && get_element_by_id(LIST_ID).is_none() {
        return Ok(false);
    }

    vm.feed().subscribe(|feed| {
        if let Err(e) = render(feed) {
            log::error!("❌ [NOTIF] Error renderizando: {:?}", e);
        }
    });

    if let Some(button) = get_element_by_id("mark-all-read") {
        let vm = vm.clone();
        on_click(&button, move |e: MouseEvent| {
            e.prevent_default();
            let vm = vm.clone();
            spawn_local(async move { vm.mark_all_read().await });
        })?;
    }

    {
        let vm = vm.clone();
        spawn_local(async move {
            vm.refresh().await;
        });
    }
    // Polling fijo, vive lo mismo que la página
    Interval::new(CONFIG.notification_poll_ms(), move || {
        let vm = vm.clone();
        spawn_local(async move {
            vm.refresh().await;
        });
    })
    .forget();

    log::info!("🔔 [NOTIF] Polling cada {}s", CONFIG.notification_poll_seconds);
    Ok(true)
}
