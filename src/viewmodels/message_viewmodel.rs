// ============================================================================
// MESSAGE VIEWMODEL - Historial de chat con un usuario y envío de mensajes
// ============================================================================

use std::rc::Rc;

use crate::models::message::sort_oldest_first;
use crate::models::{ChatMessage, MessageKind, ParseMode, SendResult, SendTextRequest};
use crate::services::alert_service::AlertLevel;
use crate::services::api::{MessageApi, MultipartPayload};
use crate::services::errors::ApiError;
use crate::state::{ReactiveState, RequestSequencer, SessionContext, WidgetState};
use crate::utils::format::escape_html;

pub const EMPTY_TEXT_ERROR: &str = "Введите текст сообщения";
pub const HISTORY_EMPTY_TEXT: &str = "Нет сообщений";
pub const HISTORY_ERROR_TEXT: &str = "Ошибка загрузки сообщений";
pub const PREVIEW_PLACEHOLDER_HTML: &str = "<p class=\"text-muted\">Предпросмотр сообщения</p>";

/// Texto de envío: vacío o solo espacios se rechaza sin llamar al API
pub fn validate_text(text: &str) -> Result<&str, ApiError> {
    if text.trim().is_empty() {
        Err(ApiError::Validation(EMPTY_TEXT_ERROR.to_string()))
    } else {
        Ok(text)
    }
}

/// HTML del preview según el modo de formato
pub fn render_preview(text: &str, mode: ParseMode) -> String {
    match mode {
        ParseMode::Html => text.to_string(),
        ParseMode::Markdown => markdown_preview(text),
        ParseMode::None => escape_html(text),
    }
}

/// Markdown mínimo: `**negrita**`, `*cursiva*` y saltos de línea
pub fn markdown_preview(text: &str) -> String {
    let bold = wrap_pairs(text, "**", "strong");
    let italic = wrap_pairs(&bold, "*", "em");
    italic.replace('\n', "<br>")
}

// Pares `delim…delim` dentro de la misma línea, el más corto posible
fn wrap_pairs(text: &str, delim: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(delim) {
        out.push_str(&rest[..start]);
        let after = &rest[start + delim.len()..];
        match after.find(delim) {
            Some(end) if !after[..end].contains('\n') => {
                out.push_str(&format!("<{tag}>{}</{tag}>", &after[..end]));
                rest = &after[end + delim.len()..];
            }
            _ => {
                out.push_str(delim);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Textos de resultado por tipo de envío (éxito, error HTTP)
fn send_texts(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Photo => ("Изображение успешно отправлено", "Ошибка при отправке изображения"),
        MessageKind::Video => ("Видео успешно отправлено", "Ошибка при отправке видео"),
        MessageKind::Audio => ("Аудио успешно отправлено", "Ошибка при отправке аудио"),
        MessageKind::Document => ("Документ успешно отправлен", "Ошибка при отправке документа"),
        MessageKind::Text | MessageKind::Other => ("Сообщение успешно отправлено", "Ошибка при отправке сообщения"),
    }
}

pub struct MessageViewModel {
    api: Rc<dyn MessageApi>,
    session: Rc<SessionContext>,
    user_id: String,
    sequencer: RequestSequencer,
    history: ReactiveState<WidgetState<Vec<ChatMessage>>>,
}

impl MessageViewModel {
    pub fn new(api: Rc<dyn MessageApi>, session: Rc<SessionContext>, user_id: &str) -> Self {
        Self {
            api,
            session,
            user_id: user_id.trim().to_string(),
            sequencer: RequestSequencer::new(),
            history: ReactiveState::new(WidgetState::Loading),
        }
    }

    pub fn history(&self) -> &ReactiveState<WidgetState<Vec<ChatMessage>>> {
        &self.history
    }

    /// Recarga el historial (carga inicial, polling y tras cada envío)
    pub async fn load_history(&self) {
        let ticket = self.sequencer.issue();
        let result = self.api.message_history(&self.user_id).await;
        if !self.sequencer.try_apply(ticket) {
            return;
        }
        match result {
            Ok(mut messages) => {
                sort_oldest_first(&mut messages);
                self.history.set(WidgetState::Ready(messages));
            }
            Err(e) => {
                log::error!("❌ [MESSAGES] Historial de {}: {}", self.user_id, e);
                self.history.set(WidgetState::Failed(e.to_string()));
            }
        }
    }

    /// Envía texto. `true` si el bot lo entregó (la vista limpia el formulario)
    pub async fn send_text(&self, text: &str, mode: ParseMode) -> bool {
        let text = match validate_text(text) {
            Ok(text) => text,
            Err(e) => {
                self.session.alert(&e.user_message(), AlertLevel::Warning);
                return false;
            }
        };
        let user_id = match self.user_id.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                log::error!("❌ [MESSAGES] user_id inválido: {:?}", self.user_id);
                return false;
            }
        };
        let request = SendTextRequest {
            user_id,
            message_text: text.to_string(),
            parse_mode: mode,
        };
        let result = self.api.send_text(&request).await;
        self.finish_send(MessageKind::Text, result).await
    }

    /// Envía foto/vídeo/audio/documento desde su formulario
    pub async fn send_media(&self, kind: MessageKind, payload: MultipartPayload) -> bool {
        let result = self.api.send_media(kind, payload).await;
        self.finish_send(kind, result).await
    }

    async fn finish_send(&self, kind: MessageKind, result: Result<SendResult, ApiError>) -> bool {
        let (success_text, error_text) = send_texts(kind);
        match result {
            Ok(SendResult { success: true, .. }) => {
                log::info!("📨 [MESSAGES] {:?} enviado a {}", kind, self.user_id);
                self.session.alert(success_text, AlertLevel::Success);
                self.load_history().await;
                true
            }
            Ok(SendResult { message, .. }) => {
                self.session.alert(&format!("Ошибка: {}", message), AlertLevel::Danger);
                false
            }
            Err(e) if e.is_unauthorized() => false,
            Err(e) => {
                log::error!("❌ [MESSAGES] Envío {:?}: {}", kind, e);
                self.session.alert(error_text, AlertLevel::Danger);
                false
            }
        }
    }
}
