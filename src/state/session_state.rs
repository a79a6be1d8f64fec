// ============================================================================
// SESSION STATE - Contexto de sesión inyectado en cada componente
// ============================================================================
// Reúne el token, la navegación y las alertas. Nada de globals: cada
// viewmodel/servicio recibe un `Rc<SessionContext>`.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::services::alert_service::{AlertLevel, AlertSink, DomAlertSink};
use crate::services::navigator::{BrowserNavigator, Navigator};
use crate::utils::constants::{AUTH_ROUTE_PREFIX, DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::utils::storage::{LocalTokenStore, TokenStore};

pub const AUTH_ERROR_TEXT: &str = "Ошибка аутентификации. Выполняется перенаправление на страницу входа...";

/// Qué hacer al cargar una página
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Stay,
    Redirect(&'static str),
}

/// Rutas públicas: `/` y todo lo que cuelga de `/auth`
pub fn is_public_route(path: &str) -> bool {
    path == LOGIN_ROUTE || path.starts_with(AUTH_ROUTE_PREFIX)
}

/// Decisión pura del guard de sesión para una carga de página
pub fn guard_decision(path: &str, has_token: bool) -> GuardDecision {
    match (has_token, path == LOGIN_ROUTE) {
        (true, true) => GuardDecision::Redirect(DASHBOARD_ROUTE),
        (false, _) if !is_public_route(path) => GuardDecision::Redirect(LOGIN_ROUTE),
        _ => GuardDecision::Stay,
    }
}

pub struct SessionContext {
    tokens: Rc<dyn TokenStore>,
    navigator: Rc<dyn Navigator>,
    alerts: Rc<dyn AlertSink>,
    redirect_pending: Cell<bool>,
    auth_redirect_delay_ms: u32,
}

impl SessionContext {
    pub fn new(tokens: Rc<dyn TokenStore>, navigator: Rc<dyn Navigator>, alerts: Rc<dyn AlertSink>) -> Self {
        Self {
            tokens,
            navigator,
            alerts,
            redirect_pending: Cell::new(false),
            auth_redirect_delay_ms: CONFIG.auth_redirect_delay_ms,
        }
    }

    /// Contexto del navegador: localStorage + window.location + #alerts-container
    pub fn browser() -> Self {
        Self::new(
            Rc::new(LocalTokenStore::new()),
            Rc::new(BrowserNavigator),
            Rc::new(DomAlertSink),
        )
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.load_token()
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Valor de la cabecera `Authorization`, si hay token
    pub fn bearer_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {}", token))
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn alert(&self, message: &str, level: AlertLevel) {
        self.alerts.show(message, level);
    }

    /// Chequeo de carga de página. Devuelve `true` si se redirigió
    pub fn on_page_load(&self) -> bool {
        let path = self.current_path();
        match guard_decision(&path, self.has_token()) {
            GuardDecision::Redirect(target) => {
                log::info!("🛡️ [GUARD] {} → {}", path, target);
                self.navigator.navigate(target);
                true
            }
            GuardDecision::Stay => false,
        }
    }

    /// Guarda el token y navega (por defecto al dashboard)
    pub fn save_auth_token(&self, token: &str, redirect: Option<&str>) -> Result<(), String> {
        self.tokens.save_token(token)?;
        log::info!("🔐 [GUARD] Token guardado");
        self.navigator.navigate(redirect.unwrap_or(DASHBOARD_ROUTE));
        Ok(())
    }

    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear_token() {
            log::error!("❌ [GUARD] {}", e);
        }
        log::info!("👋 [GUARD] Logout");
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Política global para 401/403
    pub fn handle_unauthorized(&self, status: u16) {
        let path = self.current_path();
        log::warn!("🔒 [GUARD] HTTP {} en {}", status, path);
        if is_public_route(&path) || self.redirect_pending.get() {
            return;
        }
        self.redirect_pending.set(true);
        self.alerts.show(AUTH_ERROR_TEXT, AlertLevel::Danger);
        if let Err(e) = self.tokens.clear_token() {
            log::error!("❌ [GUARD] {}", e);
        }
        self.navigator.navigate_after(LOGIN_ROUTE, self.auth_redirect_delay_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingAlerts, RecordingNavigator};
    use crate::utils::storage::MemoryTokenStore;

    fn context(path: &str, token: Option<&str>) -> (SessionContext, Rc<RecordingNavigator>, Rc<RecordingAlerts>) {
        let nav = Rc::new(RecordingNavigator::at(path));
        let alerts = Rc::new(RecordingAlerts::default());
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::default(),
        };
        let ctx = SessionContext::new(Rc::new(store), nav.clone(), alerts.clone());
        (ctx, nav, alerts)
    }

    #[test]
    fn route_classification() {
        assert!(is_public_route("/"));
        assert!(is_public_route("/auth"));
        assert!(is_public_route("/auth/telegram-login"));
        assert!(!is_public_route("/dashboard"));
        assert!(!is_public_route("/bots/page"));
    }

    #[test]
    fn guard_decisions() {
        assert_eq!(guard_decision("/", true), GuardDecision::Redirect("/dashboard"));
        assert_eq!(guard_decision("/", false), GuardDecision::Stay);
        assert_eq!(guard_decision("/bots/page", false), GuardDecision::Redirect("/"));
        assert_eq!(guard_decision("/auth/callback", false), GuardDecision::Stay);
        assert_eq!(guard_decision("/users", true), GuardDecision::Stay);
    }

    #[test]
    fn page_load_redirects_anonymous_user() {
        let (ctx, nav, _) = context("/reports", None);
        assert!(ctx.on_page_load());
        assert_eq!(nav.visits(), vec!["/".to_string()]);
    }

    #[test]
    fn bearer_header_only_with_token() {
        let (ctx, _, _) = context("/dashboard", Some("abc"));
        assert_eq!(ctx.bearer_header().as_deref(), Some("Bearer abc"));
        let (ctx, _, _) = context("/dashboard", None);
        assert_eq!(ctx.bearer_header(), None);
    }

    #[test]
    fn save_token_defaults_to_dashboard() {
        let (ctx, nav, _) = context("/", None);
        ctx.save_auth_token("t1", None).unwrap();
        ctx.save_auth_token("t2", Some("/bots/page")).unwrap();
        assert_eq!(ctx.token().as_deref(), Some("t2"));
        assert_eq!(nav.visits(), vec!["/dashboard".to_string(), "/bots/page".to_string()]);
    }

    #[test]
    fn logout_clears_token_and_goes_home() {
        let (ctx, nav, _) = context("/dashboard", Some("abc"));
        ctx.logout();
        assert!(!ctx.has_token());
        assert_eq!(nav.visits(), vec!["/".to_string()]);
    }

    #[test]
    fn unauthorized_schedules_a_single_delayed_redirect() {
        let (ctx, nav, alerts) = context("/bots/page", Some("abc"));
        ctx.handle_unauthorized(401);
        ctx.handle_unauthorized(403);
        assert!(!ctx.has_token());
        assert_eq!(nav.delayed(), vec![("/".to_string(), CONFIG.auth_redirect_delay_ms)]);
        assert_eq!(alerts.messages(), vec![(AUTH_ERROR_TEXT.to_string(), AlertLevel::Danger)]);
    }

    #[test]
    fn unauthorized_on_public_route_is_ignored() {
        let (ctx, nav, alerts) = context("/auth/login", Some("abc"));
        ctx.handle_unauthorized(401);
        assert!(ctx.has_token());
        assert!(nav.delayed().is_empty());
        assert!(alerts.messages().is_empty());
    }
}
