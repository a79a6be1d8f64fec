// ============================================================================
// APP - Arranque de la consola en la página actual
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::services::chart_service::JsChartBackend;
use crate::state::AppState;
use crate::viewmodels::{
    BotFormViewModel, CategoryViewModel, DashboardViewModel, MessageViewModel,
    NotificationViewModel, SessionViewModel,
};
use crate::views::{self, CHART_CANVAS_ID};

/// Aplicación principal
pub struct App {
    state: AppState,
    mounted: Vec<&'static str>,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::browser(),
            mounted: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Guard de sesión y montaje de cada controlador presente en la página.
    /// Devuelve `false` si el guard ya redirigió
    pub fn start(&mut self) -> Result<bool, JsValue> {
        let session = self.state.session.clone();
        if session.on_page_load() {
            return Ok(false);
        }
        let api = self.state.api.clone();
        let path = session.current_path();

        views::mount_nav(session.clone())?;
        self.mounted.push("nav");

        let login = Rc::new(SessionViewModel::new(api.clone(), session.clone()));
        if views::mount_login(login, &path) {
            self.mounted.push("login");
        }

        let notifications = Rc::new(NotificationViewModel::new(api.clone(), session.clone()));
        if views::mount_notifications(notifications)? {
            self.mounted.push("notifications");
        }

        let dashboard = Rc::new(DashboardViewModel::new(api.clone(), JsChartBackend::new(CHART_CANVAS_ID)));
        if views::mount_dashboard(dashboard)? {
            self.mounted.push("dashboard");
        }

        let categories = Rc::new(CategoryViewModel::new(api.clone(), session.clone()));
        if views::mount_categories(categories)? {
            self.mounted.push("categories");
        }

        let bot_form = Rc::new(BotFormViewModel::new(api.clone(), session.clone()));
        if views::mount_bot_form(bot_form)? {
            self.mounted.push("bot-form");
        }

        if let Some(user_id) = views::page_user_id() {
            let messages = Rc::new(MessageViewModel::new(api, session, &user_id));
            if views::mount_messages(messages)? {
                self.mounted.push("messages");
            }
        }

        log::info!("✅ [APP] {} montado: {}", path, self.mounted.join(", "));
        Ok(true)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
