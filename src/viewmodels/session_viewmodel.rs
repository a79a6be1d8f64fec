// ============================================================================
// SESSION VIEWMODEL - Login con Telegram y cierre de sesión
// ============================================================================
// El widget de Telegram llama a `onTelegramAuth(user)`; aquí se cambia ese
// payload por un token del backend y se guarda vía el guard de sesión.
// ============================================================================

use std::rc::Rc;

use crate::models::TelegramAuthPayload;
use crate::services::alert_service::AlertLevel;
use crate::services::api::AuthApi;
use crate::state::SessionContext;

pub struct SessionViewModel {
    api: Rc<dyn AuthApi>,
    session: Rc<SessionContext>,
}

impl SessionViewModel {
    pub fn new(api: Rc<dyn AuthApi>, session: Rc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// Login con los datos del widget. Devuelve `true` si se guardó el token
    pub async fn telegram_login(&self, payload: TelegramAuthPayload) -> bool {
        log::info!("🔐 [AUTH] Login Telegram para id {}", payload.id);
        match self.api.telegram_login(&payload).await {
            Ok(token) => match self.session.save_auth_token(&token.access_token, None) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("❌ [AUTH] {}", e);
                    self.session.alert(&e, AlertLevel::Danger);
                    false
                }
            },
            Err(e) => {
                log::error!("❌ [AUTH] Login rechazado: {}", e);
                self.session
                    .alert(&format!("Ошибка авторизации: {}", e.user_message()), AlertLevel::Danger);
                false
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenResponse;
    use crate::services::errors::ApiError;
    use crate::testing::{session_at, Scripted};
    use async_trait::async_trait;
    use futures::executor::block_on;

    #[derive(Default)]
    struct FakeAuth {
        replies: Scripted<TokenResponse>,
    }

    #[async_trait(?Send)]
    impl AuthApi for FakeAuth {
        async fn telegram_login(&self, _payload: &TelegramAuthPayload) -> Result<TokenResponse, ApiError> {
            self.replies.next().await
        }
    }

    fn payload() -> TelegramAuthPayload {
        TelegramAuthPayload {
            id: 1001,
            first_name: "Ana".into(),
            username: None,
            photo_url: None,
            auth_date: 1_700_000_000,
            hash: "abc".into(),
        }
    }

    #[test]
    fn successful_login_saves_token_and_opens_dashboard() {
        let api = Rc::new(FakeAuth::default());
        api.replies.push(Ok(TokenResponse { access_token: "jwt".into(), token_type: Some("bearer".into()) }));
        let session = session_at("/");
        let vm = SessionViewModel::new(api, session.context.clone());

        assert!(block_on(vm.telegram_login(payload())));
        assert_eq!(session.context.token().as_deref(), Some("jwt"));
        assert_eq!(session.navigator.visits(), vec!["/dashboard".to_string()]);
    }

    #[test]
    fn forbidden_login_shows_detail() {
        let api = Rc::new(FakeAuth::default());
        api.replies.push(Err(ApiError::Unauthorized {
            status: 403,
            detail: Some("You don't have permission to access admin panel".into()),
        }));
        let session = session_at("/");
        let vm = SessionViewModel::new(api, session.context.clone());

        assert!(!block_on(vm.telegram_login(payload())));
        assert_eq!(
            session.alerts.last(),
            Some((
                "Ошибка авторизации: You don't have permission to access admin panel".into(),
                AlertLevel::Danger
            ))
        );
    }

    #[test]
    fn logout_goes_to_login_route() {
        let session = session_at("/dashboard");
        let vm = SessionViewModel::new(Rc::new(FakeAuth::default()), session.context.clone());
        vm.logout();
        assert!(!session.context.has_token());
        assert_eq!(session.navigator.visits(), vec!["/".to_string()]);
    }
}
