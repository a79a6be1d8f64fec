use serde::{Deserialize, Serialize};

use crate::utils::format::parse_timestamp;

/// Tipo de mensaje del historial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Photo,
    Video,
    Audio,
    Document,
    #[serde(other)]
    Other,
}

impl MessageKind {
    /// Endpoint `POST /messages/send-…` para los tipos que se pueden enviar
    pub fn send_path(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("/messages/send-text"),
            Self::Photo => Some("/messages/send-photo"),
            Self::Video => Some("/messages/send-video"),
            Self::Audio => Some("/messages/send-audio"),
            Self::Document => Some("/messages/send-document"),
            Self::Other => None,
        }
    }
}

/// Entrada de `GET /messages/message-history/:userId`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_from_admin: bool,
    #[serde(default)]
    pub media_url: Option<String>,
    pub created_at: String,
}

impl ChatMessage {
    pub fn sender_label(&self) -> &'static str {
        if self.is_from_admin {
            "Администратор"
        } else {
            "Пользователь"
        }
    }

    pub fn css_class(&self) -> &'static str {
        if self.is_from_admin {
            "message message-admin"
        } else {
            "message message-user"
        }
    }
}

/// Ordena el historial del más antiguo al más reciente. Las fechas que no
/// se pueden parsear van primero, manteniendo su orden relativo
pub fn sort_oldest_first(messages: &mut [ChatMessage]) {
    messages.sort_by_key(|message| parse_timestamp(&message.created_at));
}

/// Modo de formato del texto enviado por el bot de Telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    Html,
    Markdown,
    None,
}

impl ParseMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "markdown" => Self::Markdown,
            "none" => Self::None,
            _ => Self::Html,
        }
    }
}

/// Cuerpo de `POST /messages/send-text`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendTextRequest {
    pub user_id: i64,
    pub message_text: String,
    pub parse_mode: ParseMode,
}

/// Respuesta de los endpoints de envío
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: i64, created_at: &str) -> ChatMessage {
        ChatMessage {
            id,
            kind: MessageKind::Text,
            content: None,
            is_from_admin: false,
            media_url: None,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn history_is_sorted_oldest_first() {
        let mut history = vec![
            msg(3, "2024-02-01T10:00:00"),
            msg(1, "2024-01-01T10:00:00"),
            msg(2, "2024-01-15T08:30:00.5"),
        ];
        sort_oldest_first(&mut history);
        let ids: Vec<i64> = history.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_message_type_decodes_as_other() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"id": 1, "type": "sticker", "content": null, "is_from_admin": true,
                "media_url": null, "created_at": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(message.kind, MessageKind::Other);
        assert_eq!(message.kind.send_path(), None);
        assert_eq!(message.sender_label(), "Администратор");
    }

    #[test]
    fn send_text_serialises_parse_mode_lowercase() {
        let body = SendTextRequest {
            user_id: 5,
            message_text: "hola".into(),
            parse_mode: ParseMode::parse("Markdown"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["parse_mode"], "markdown");
        assert_eq!(json["user_id"], 5);
    }
}
