// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP
// ============================================================================
// Sin lógica de negocio: construye requests, añade el Bearer token y
// traduce el status HTTP a `ApiError`. Los 401/403 se entregan al guard
// de sesión (política global); el resto vuelve al widget que llamó.
// ============================================================================

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::FormData;

use crate::config::CONFIG;
use crate::models::{
    BotCategory, BotSaveTarget, BotSummary, CategoryPayload, ChatMessage, CountResponse, ErrorBody,
    LatestBugReport, LatestSale, MessageKind, NotificationFeed, PaymentStats, SendResult,
    SendTextRequest, TelegramAuthPayload, TokenResponse,
};
use crate::services::api::{
    AuthApi, BotApi, CategoryApi, DashboardApi, MessageApi, MultipartPayload, NotificationApi,
};
use crate::services::errors::{classify_status, ApiError, StatusClass};
use crate::state::SessionContext;
use crate::utils::constants::*;

/// Cliente API (sin estado propio salvo el contexto de sesión)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: Rc<SessionContext>,
}

impl ApiClient {
    pub fn new(session: Rc<SessionContext>) -> Self {
        Self {
            base_url: CONFIG.backend_url().to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Añade `Authorization: Bearer <token>` si hay token
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_header() {
            Some(value) => builder.header("Authorization", &value),
            None => builder,
        }
    }

    async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let method = request.method();
        let url = request.url();
        let response = request.send().await.map_err(|e| {
            log::error!("❌ [API] {} {} → red: {}", method, url, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let class = classify_status(status);
        if class == StatusClass::Success {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        if class == StatusClass::Unauthorized {
            log::warn!("🔒 [API] {} {} → {}", method, url, status);
            self.session.handle_unauthorized(status);
            return Err(ApiError::Unauthorized { status, detail });
        }
        log::warn!("⚠️ [API] {} {} → {} ({:?})", method, url, status, detail);
        Err(ApiError::Server { status, detail })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(Request::get(&self.url(path))).build()?;
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B: Serialize>(&self, builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
        let request = self.authorized(builder).json(body)?;
        self.execute(request).await
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.authorized(builder).build()?;
        self.execute(request).await
    }

    async fn send_multipart(&self, builder: RequestBuilder, payload: MultipartPayload) -> Result<Response, ApiError> {
        let data = form_data(payload).map_err(|e| ApiError::Network(format!("{:?}", e)))?;
        let request = self.authorized(builder).body(data)?;
        self.execute(request).await
    }

    async fn count(&self, path: &str) -> Result<u64, ApiError> {
        Ok(self.get_json::<CountResponse>(path).await?.count)
    }
}

fn form_data(payload: MultipartPayload) -> Result<FormData, JsValue> {
    let data = match &payload.form {
        Some(form) => FormData::new_with_form(form)?,
        None => FormData::new()?,
    };
    for (name, value) in &payload.fields {
        data.append_with_str(name, value)?;
    }
    for (name, file) in &payload.files {
        data.append_with_blob_and_filename(name, file, &file.name())?;
    }
    Ok(data)
}

#[async_trait(?Send)]
impl NotificationApi for ApiClient {
    async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
        self.get_json(NOTIFICATIONS_PATH).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.send_empty(Request::post(&self.url(NOTIFICATIONS_MARK_READ_PATH))).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl DashboardApi for ApiClient {
    async fn users_count(&self) -> Result<u64, ApiError> {
        self.count(USERS_COUNT_PATH).await
    }

    async fn payment_stats(&self) -> Result<PaymentStats, ApiError> {
        self.get_json(PAYMENTS_STATS_PATH).await
    }

    async fn bots_count(&self) -> Result<u64, ApiError> {
        self.count(BOTS_COUNT_PATH).await
    }

    async fn reports_count(&self) -> Result<u64, ApiError> {
        self.count(REPORTS_COUNT_PATH).await
    }

    async fn latest_sales(&self) -> Result<Vec<LatestSale>, ApiError> {
        self.get_json(PAYMENTS_LATEST_PATH).await
    }

    async fn latest_reports(&self) -> Result<Vec<LatestBugReport>, ApiError> {
        self.get_json(REPORTS_LATEST_PATH).await
    }
}

#[async_trait(?Send)]
impl CategoryApi for ApiClient {
    async fn list_categories(&self) -> Result<Vec<BotCategory>, ApiError> {
        self.get_json(CATEGORIES_PATH).await
    }

    async fn list_bots(&self) -> Result<Vec<BotSummary>, ApiError> {
        self.get_json(BOTS_PATH).await
    }

    async fn get_category(&self, id: &str) -> Result<BotCategory, ApiError> {
        self.get_json(&format!("{}/{}", CATEGORIES_PATH, id)).await
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<(), ApiError> {
        self.send_json(Request::post(&self.url(CATEGORIES_PATH)), payload).await?;
        Ok(())
    }

    async fn update_category(&self, id: &str, payload: &CategoryPayload) -> Result<(), ApiError> {
        let url = self.url(&format!("{}/{}", CATEGORIES_PATH, id));
        self.send_json(Request::put(&url), payload).await?;
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("{}/{}", CATEGORIES_PATH, id));
        self.send_empty(Request::delete(&url)).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl BotApi for ApiClient {
    async fn category(&self, id: &str) -> Result<BotCategory, ApiError> {
        CategoryApi::get_category(self, id).await
    }

    async fn save_bot(&self, target: &BotSaveTarget, payload: MultipartPayload) -> Result<(), ApiError> {
        let builder = match target {
            BotSaveTarget::Create => Request::post(&self.url(BOTS_PATH)),
            BotSaveTarget::Update(id) => Request::put(&self.url(&format!("{}/{}", BOTS_PATH, id))),
        };
        log::info!("🤖 [API] Guardando bot ({} archivos)", payload.file_count());
        self.send_multipart(builder, payload).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl MessageApi for ApiClient {
    async fn message_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_json(&format!("{}/{}", MESSAGE_HISTORY_PATH, user_id)).await
    }

    async fn send_text(&self, request: &SendTextRequest) -> Result<SendResult, ApiError> {
        let path = MessageKind::Text.send_path().unwrap_or("/messages/send-text");
        let response = self.send_json(Request::post(&self.url(path)), request).await?;
        Ok(response.json::<SendResult>().await?)
    }

    async fn send_media(&self, kind: MessageKind, payload: MultipartPayload) -> Result<SendResult, ApiError> {
        let path = kind
            .send_path()
            .ok_or_else(|| ApiError::Validation(format!("Тип сообщения не поддерживается: {:?}", kind)))?;
        let response = self.send_multipart(Request::post(&self.url(path)), payload).await?;
        Ok(response.json::<SendResult>().await?)
    }
}

#[async_trait(?Send)]
impl AuthApi for ApiClient {
    async fn telegram_login(&self, payload: &TelegramAuthPayload) -> Result<TokenResponse, ApiError> {
        let response = self
            .send_json(Request::post(&self.url(TELEGRAM_LOGIN_PATH)), payload)
            .await?;
        Ok(response.json::<TokenResponse>().await?)
    }
}
