use serde::{Deserialize, Serialize};

/// Datos que entrega el widget de login de Telegram
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TelegramAuthPayload {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Cuerpo de error estándar del backend (`{"detail": "..."}`), o el
/// `{"success": false, "message": "..."}` de los endpoints de mensajes
#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Texto legible del error; `detail` puede ser string o la lista de
    /// errores de validación de FastAPI
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .map(str::to_string)
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
            Some(serde_json::Value::Null) | None => self.message,
            Some(other) => Some(other.to_string()),
        }
        .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(json: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(json).unwrap().into_detail()
    }

    #[test]
    fn detail_string_is_used_verbatim() {
        assert_eq!(detail(r#"{"detail": "Category not found"}"#).as_deref(), Some("Category not found"));
    }

    #[test]
    fn validation_list_is_joined() {
        let text = detail(r#"{"detail": [{"msg": "field required"}, {"msg": "value is not a valid float"}]}"#);
        assert_eq!(text.as_deref(), Some("field required; value is not a valid float"));
    }

    #[test]
    fn message_field_is_fallback() {
        assert_eq!(detail(r#"{"success": false, "message": "Пользователь не найден"}"#).as_deref(), Some("Пользователь не найден"));
        assert_eq!(detail(r#"{}"#), None);
        assert_eq!(detail(r#"{"detail": ""}"#), None);
    }

    #[test]
    fn telegram_payload_skips_missing_optionals() {
        let payload = TelegramAuthPayload {
            id: 1,
            first_name: "Ivan".into(),
            username: None,
            photo_url: None,
            auth_date: 1_700_000_000,
            hash: "abc".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("username").is_none());
        assert_eq!(json["auth_date"], 1_700_000_000i64);
    }
}
