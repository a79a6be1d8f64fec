// ============================================================================
// CONFIG - Configuración de la consola resuelta en tiempo de compilación
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL base del API. Vacía = mismo origen que la página
    pub backend_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub notification_poll_seconds: u32,
    pub message_poll_seconds: u32,
    pub alert_duration_ms: u32,
    pub auth_redirect_delay_ms: u32,
    pub submit_redirect_delay_ms: u32,
    pub max_image_previews: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            environment: "development".to_string(),
            enable_logging: true,
            notification_poll_seconds: 30,
            message_poll_seconds: 30,
            alert_duration_ms: 5000,
            auth_redirect_delay_ms: 2000,
            submit_redirect_delay_ms: 1000,
            max_image_previews: 5,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            notification_poll_seconds: parse_or(
                option_env!("NOTIFICATION_POLL_SECONDS"),
                defaults.notification_poll_seconds,
            ),
            message_poll_seconds: parse_or(
                option_env!("MESSAGE_POLL_SECONDS"),
                defaults.message_poll_seconds,
            ),
            alert_duration_ms: parse_or(option_env!("ALERT_DURATION_MS"), defaults.alert_duration_ms),
            auth_redirect_delay_ms: parse_or(
                option_env!("AUTH_REDIRECT_DELAY_MS"),
                defaults.auth_redirect_delay_ms,
            ),
            submit_redirect_delay_ms: parse_or(
                option_env!("SUBMIT_REDIRECT_DELAY_MS"),
                defaults.submit_redirect_delay_ms,
            ),
            max_image_previews: parse_or(option_env!("MAX_IMAGE_PREVIEWS"), defaults.max_image_previews),
        }
    }

    /// URL base del backend
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn notification_poll_ms(&self) -> u32 {
        self.notification_poll_seconds.saturating_mul(1000)
    }

    pub fn message_poll_ms(&self) -> u32 {
        self.message_poll_seconds.saturating_mul(1000)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or::<u32>(Some("abc"), 30), 30);
        assert_eq!(parse_or::<u32>(Some(" 45 "), 30), 45);
        assert_eq!(parse_or::<u32>(None, 30), 30);
        assert!(!parse_or::<bool>(Some("false"), true));
    }

    #[test]
    fn poll_intervals_are_in_milliseconds() {
        let config = AppConfig::default();
        assert_eq!(config.notification_poll_ms(), 30_000);
        assert_eq!(config.message_poll_ms(), 30_000);
        assert_eq!(config.max_image_previews, 5);
    }
}
