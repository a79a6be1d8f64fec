// ============================================================================
// APP STATE - Dependencias compartidas por todos los controladores de página
// ============================================================================

use std::rc::Rc;

use crate::services::api_client::ApiClient;
use crate::state::SessionContext;

/// Estado global de la aplicación: sesión + cliente HTTP
#[derive(Clone)]
pub struct AppState {
    pub session: Rc<SessionContext>,
    pub api: Rc<ApiClient>,
}

impl AppState {
    pub fn new(session: Rc<SessionContext>) -> Self {
        let api = Rc::new(ApiClient::new(session.clone()));
        Self { session, api }
    }

    /// Estado del navegador (localStorage, window.location, alertas DOM)
    pub fn browser() -> Self {
        Self::new(Rc::new(SessionContext::browser()))
    }
}
