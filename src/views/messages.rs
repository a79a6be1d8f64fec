// ============================================================================
// MESSAGES VIEW - Chat con un usuario: historial, preview y formularios de envío
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlFormElement, Url};

use crate::config::CONFIG;
use crate::dom::{
    append_child, checked_radio_value, get_element_by_id, get_value, get_value_by_id, input_by_id, on_change,
    on_input, on_submit, query_selector, query_selector_all, read_as_data_url, selected_files,
    set_attribute, set_text_by_id, set_value_by_id, set_visible, set_visible_by_id, ElementBuilder,
};
use crate::models::{ChatMessage, MessageKind, ParseMode};
use crate::services::api::MultipartPayload;
use crate::state::{RequestSequencer, Ticket, WidgetState};
use crate::utils::format::format_datetime;
use crate::viewmodels::message_viewmodel::{
    render_preview, HISTORY_EMPTY_TEXT, HISTORY_ERROR_TEXT, PREVIEW_PLACEHOLDER_HTML,
};
use crate::viewmodels::MessageViewModel;

const HISTORY_ID: &str = "message-history";
const TEXT_PREVIEW_ID: &str = "text-preview";

/// `user_id` del input oculto de la página de chat
pub fn page_user_id() -> Option<String> {
    query_selector("input[name=\"user_id\"]")
        .ok()
        .flatten()
        .map(|input| get_value(&input))
        .filter(|value| !value.trim().is_empty())
}

fn media_html(message: &ChatMessage) -> Option<String> {
    let url = message.media_url.as_deref()?;
    match message.kind {
        MessageKind::Photo => Some(format!("<img src=\"{}\" class=\"message-media\"><br>", url)),
        MessageKind::Video => Some(format!("<video src=\"{}\" class=\"message-media\" controls></video><br>", url)),
        MessageKind::Audio => Some(format!("<audio src=\"{}\" class=\"message-media\" controls></audio><br>", url)),
        MessageKind::Document => Some(format!(
            "<a href=\"{}\" target=\"_blank\" class=\"btn btn-sm btn-outline-primary\">\
             <i class=\"fas fa-file-download\"></i> Скачать документ</a><br>",
            url
        )),
        MessageKind::Text | MessageKind::Other => None,
    }
}

fn message_bubble(message: &ChatMessage) -> Result<Element, JsValue> {
    let sender = ElementBuilder::new("div")?
        .class("message-sender")
        .html(&format!("<strong>{}</strong>", message.sender_label()))
        .build();

    // El contenido llega ya formateado por el bot (HTML)
    let mut content = media_html(message).unwrap_or_default();
    if let Some(text) = message.content.as_deref() {
        content.push_str(text);
    }
    let content = ElementBuilder::new("div")?.class("message-content").html(&content).build();
    let time = ElementBuilder::new("div")?
        .class("message-time")
        .text(&format_datetime(&message.created_at))
        .build();

    Ok(ElementBuilder::new("div")?
        .class(message.css_class())
        .children([sender, content, time])?
        .build())
}

fn render_history(state: &WidgetState<Vec<ChatMessage>>) -> Result<(), JsValue> {
    let Some(container) = get_element_by_id(HISTORY_ID) else {
        return Ok(());
    };
    match state {
        WidgetState::Loading => {}
        WidgetState::Failed(_) => {
            container.set_inner_html(&format!("<p class=\"text-center text-danger\">{}</p>", HISTORY_ERROR_TEXT));
        }
        WidgetState::Ready(messages) if messages.is_empty() => {
            container.set_inner_html(&format!("<p class=\"text-center text-muted\">{}</p>", HISTORY_EMPTY_TEXT));
        }
        WidgetState::Ready(messages) => {
            container.set_inner_html("");
            for message in messages {
                append_child(&container, &message_bubble(message)?)?;
            }
            // Siempre al último mensaje
            container.set_scroll_top(container.scroll_height());
        }
    }
    Ok(())
}

fn current_mode() -> ParseMode {
    checked_radio_value("parse_mode")
        .map(|raw| ParseMode::parse(&raw))
        .unwrap_or(ParseMode::Html)
}

fn update_text_preview() {
    let Some(preview) = get_element_by_id(TEXT_PREVIEW_ID) else {
        return;
    };
    let text = get_value_by_id("message_text");
    match current_mode() {
        ParseMode::None => preview.set_text_content(Some(&text)),
        mode => preview.set_inner_html(&render_preview(&text, mode)),
    }
}

fn reset_form(form: &HtmlFormElement) {
    form.reset();
}

fn bind_text_form(vm: &Rc<MessageViewModel>) -> Result<(), JsValue> {
    if let Some(input) = get_element_by_id("message_text") {
        on_input(&input, |_e: Event| update_text_preview())?;
    }
    for radio in query_selector_all("input[name=\"parse_mode\"]")? {
        on_change(&radio, |_e: Event| update_text_preview())?;
    }

    let Some(form) = get_element_by_id("text-message-form") else {
        return Ok(());
    };
    let vm = vm.clone();
    on_submit(&form, move || {
        let vm = vm.clone();
        let text = get_value_by_id("message_text");
        let mode = current_mode();
        spawn_local(async move {
            if vm.send_text(&text, mode).await {
                set_value_by_id("message_text", "");
                if let Some(preview) = get_element_by_id(TEXT_PREVIEW_ID) {
                    preview.set_inner_html(PREVIEW_PLACEHOLDER_HTML);
                }
            }
        });
    })
}

/// Preview local de un formulario de media: lecturas de foto en vuelo y
/// object URL vigente de vídeo/audio
#[derive(Debug, Default)]
struct MediaPreview {
    reads: RequestSequencer,
    object_url: RefCell<Option<String>>,
}

impl MediaPreview {
    fn begin_read(&self) -> Ticket {
        self.reads.issue()
    }

    fn is_current_read(&self, ticket: Ticket) -> bool {
        self.reads.is_latest(ticket)
    }

    /// Guarda la nueva URL; devuelve la anterior, que hay que revocar
    fn swap_object_url(&self, url: Option<String>) -> Option<String> {
        self.object_url.replace(url)
    }

    /// Descarta lecturas en vuelo y suelta la URL actual
    fn clear(&self) -> Option<String> {
        self.reads.issue();
        self.swap_object_url(None)
    }
}

fn revoke_object_url(url: Option<String>) {
    if let Some(url) = url {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("⚠️ [MESSAGES] No se pudo revocar {}: {:?}", url, e);
        }
    }
}

/// Preview local del archivo elegido en cada formulario de media
fn show_media_preview(kind: MessageKind, input_id: &str, preview_id: &str, preview: &Rc<MediaPreview>) {
    let file = input_by_id(input_id).and_then(|input| selected_files(&input).into_iter().next());
    let Some(file) = file else {
        revoke_object_url(preview.clear());
        set_visible_by_id(preview_id, false);
        return;
    };
    match kind {
        MessageKind::Photo => {
            let ticket = preview.begin_read();
            let preview = preview.clone();
            let preview_id = preview_id.to_string();
            spawn_local(async move {
                match read_as_data_url(&file).await {
                    Ok(url) => {
                        // Una foto elegida después ya manda
                        if !preview.is_current_read(ticket) {
                            return;
                        }
                        if let Some(img) = get_element_by_id(&preview_id) {
                            let _ = set_attribute(&img, "src", &url);
                            set_visible(&img, true);
                        }
                    }
                    Err(e) => log::warn!("⚠️ [MESSAGES] No se pudo leer la foto: {:?}", e),
                }
            });
        }
        MessageKind::Video | MessageKind::Audio => match Url::create_object_url_with_blob(&file) {
            Ok(url) => {
                revoke_object_url(preview.swap_object_url(Some(url.clone())));
                if let Some(player) = get_element_by_id(preview_id) {
                    let _ = set_attribute(&player, "src", &url);
                    set_visible(&player, true);
                }
            }
            Err(e) => log::warn!("⚠️ [MESSAGES] Object URL: {:?}", e),
        },
        MessageKind::Document => {
            set_text_by_id(preview_id, &format!("Выбран файл: {}", file.name()));
            set_visible_by_id(preview_id, true);
        }
        MessageKind::Text | MessageKind::Other => {}
    }
}

fn bind_media_form(vm: &Rc<MessageViewModel>, kind: MessageKind, name: &str) -> Result<(), JsValue> {
    let input_id = name.to_string();
    let preview_id = match kind {
        MessageKind::Document => "document-preview-name".to_string(),
        _ => format!("{}-preview", name),
    };

    let preview = Rc::new(MediaPreview::default());
    if let Some(input) = get_element_by_id(&input_id) {
        let (input_id, preview_id, preview) = (input_id.clone(), preview_id.clone(), preview.clone());
        on_change(&input, move |_e: Event| show_media_preview(kind, &input_id, &preview_id, &preview))?;
    }

    let Some(form) = get_element_by_id(&format!("{}-message-form", name))
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };
    let vm = vm.clone();
    let this = form.clone();
    on_submit(&form, move || {
        let vm = vm.clone();
        let form = this.clone();
        let preview_id = preview_id.clone();
        let preview = preview.clone();
        spawn_local(async move {
            let payload = MultipartPayload::from_form(form.clone());
            if vm.send_media(kind, payload).await {
                reset_form(&form);
                revoke_object_url(preview.clear());
                set_visible_by_id(&preview_id, false);
            }
        });
    })
}

pub fn mount_messages(vm: Rc<MessageViewModel>) -> Result<bool, JsValue> {
    if get_element_by_id(HISTORY_ID).is_none() {
        return Ok(false);
    }

    vm.history().subscribe(|state| {
        if let Err(e) = render_history(state) {
            log::error!("❌ [MESSAGES] Error renderizando: {:?}", e);
        }
    });

    bind_text_form(&vm)?;
    for (kind, name) in [
        (MessageKind::Photo, "photo"),
        (MessageKind::Video, "video"),
        (MessageKind::Audio, "audio"),
        (MessageKind::Document, "document"),
    ] {
        bind_media_form(&vm, kind, name)?;
    }

    {
        let vm = vm.clone();
        spawn_local(async move { vm.load_history().await });
    }
    Interval::new(CONFIG.message_poll_ms(), move || {
        let vm = vm.clone();
        spawn_local(async move { vm.load_history().await });
    })
    .forget();

    log::info!("💬 [MESSAGES] Chat montado");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: MessageKind, media_url: Option<&str>) -> ChatMessage {
        ChatMessage {
            id: 1,
            kind,
            content: None,
            is_from_admin: false,
            media_url: media_url.map(str::to_string),
            created_at: "2024-01-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn media_html_depends_on_kind_and_url() {
        assert!(media_html(&message(MessageKind::Photo, Some("/m/p.jpg")))
            .unwrap()
            .starts_with("<img src=\"/m/p.jpg\""));
        assert!(media_html(&message(MessageKind::Document, Some("/m/d.pdf")))
            .unwrap()
            .contains("Скачать документ"));
        assert_eq!(media_html(&message(MessageKind::Text, Some("/m/x"))), None);
        assert_eq!(media_html(&message(MessageKind::Video, None)), None);
    }

    #[test]
    fn slower_read_of_earlier_photo_is_dropped() {
        let preview = MediaPreview::default();
        let first = preview.begin_read();
        let second = preview.begin_read();
        assert!(!preview.is_current_read(first));
        assert!(preview.is_current_read(second));

        // Vaciar el input o enviar deja fuera también la última lectura
        assert_eq!(preview.clear(), None);
        assert!(!preview.is_current_read(second));
    }

    #[test]
    fn replaced_object_url_is_handed_back_for_revocation() {
        let preview = MediaPreview::default();
        assert_eq!(preview.swap_object_url(Some("blob:a".to_string())), None);
        assert_eq!(preview.swap_object_url(Some("blob:b".to_string())), Some("blob:a".to_string()));
        assert_eq!(preview.clear(), Some("blob:b".to_string()));
        assert_eq!(preview.clear(), None);
    }
}
