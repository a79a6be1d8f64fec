// ============================================================================
// API ERRORS - Taxonomía de errores de la consola
// ============================================================================
// Red (transporte), autorización (401/403, la maneja el guard de sesión),
// negocio/validación con `detail` del servidor, y rechazos locales.
// ============================================================================

use crate::utils::constants::UNKNOWN_ERROR_TEXT;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: not authorized")]
    Unauthorized { status: u16, detail: Option<String> },
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },
    #[error("parse error: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
}

/// Clasificación de un código HTTP antes de leer el cuerpo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Unauthorized,
    Failure,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        401 | 403 => StatusClass::Unauthorized,
        _ => StatusClass::Failure,
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Detalle legible enviado por el servidor, si lo hay
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } | Self::Unauthorized { detail, .. } => detail.as_deref(),
            Self::Validation(message) => Some(message),
            _ => None,
        }
    }

    /// Texto para el usuario: el detalle tal cual o el genérico
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or(UNKNOWN_ERROR_TEXT).to_string()
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(204), StatusClass::Success);
        assert_eq!(classify_status(401), StatusClass::Unauthorized);
        assert_eq!(classify_status(403), StatusClass::Unauthorized);
        assert_eq!(classify_status(404), StatusClass::Failure);
        assert_eq!(classify_status(500), StatusClass::Failure);
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let err = ApiError::Server { status: 400, detail: Some("Bot with this name already exists".into()) };
        assert_eq!(err.user_message(), "Bot with this name already exists");
        let err = ApiError::Server { status: 500, detail: None };
        assert_eq!(err.user_message(), UNKNOWN_ERROR_TEXT);
        assert_eq!(ApiError::Network("offline".into()).user_message(), UNKNOWN_ERROR_TEXT);
        assert!(ApiError::Unauthorized { status: 401, detail: None }.is_unauthorized());
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Server { status: 422, detail: None };
        assert_eq!(err.to_string(), "HTTP 422: no detail");
    }
}
