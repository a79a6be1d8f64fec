// ============================================================================
// WIDGET STATE - Estado independiente de cada panel del dashboard
// ============================================================================

use crate::services::errors::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> WidgetState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for WidgetState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> From<Result<T, ApiError>> for WidgetState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_conversion() {
        let ok: WidgetState<u64> = Ok(3).into();
        assert_eq!(ok.value(), Some(&3));
        let failed: WidgetState<u64> = Err(ApiError::Network("timeout".into())).into();
        assert!(failed.is_failed());
        assert_eq!(failed, WidgetState::Failed("network error: timeout".into()));
    }
}
