// ============================================================================
// API TRAITS - Contratos de cada componente con el backend
// ============================================================================
// Los viewmodels dependen de estos traits, no de `ApiClient`: en tests se
// sustituyen por fakes en memoria.
// ============================================================================

use async_trait::async_trait;
use web_sys::{File, HtmlFormElement};

use crate::models::{
    BotCategory, BotSaveTarget, BotSummary, CategoryPayload, ChatMessage, LatestBugReport, LatestSale,
    MessageKind, NotificationFeed, PaymentStats, SendResult, SendTextRequest, TelegramAuthPayload,
    TokenResponse,
};
use crate::services::errors::ApiError;

/// Cuerpo multipart: campos de un `<form>` opcional más campos y archivos extra
#[derive(Default)]
pub struct MultipartPayload {
    pub form: Option<HtmlFormElement>,
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, File)>,
}

impl MultipartPayload {
    pub fn from_form(form: HtmlFormElement) -> Self {
        Self { form: Some(form), ..Self::default() }
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn file(mut self, name: &str, file: File) -> Self {
        self.files.push((name.to_string(), file));
        self
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[async_trait(?Send)]
pub trait NotificationApi {
    async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError>;
    async fn mark_all_read(&self) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
pub trait DashboardApi {
    async fn users_count(&self) -> Result<u64, ApiError>;
    async fn payment_stats(&self) -> Result<PaymentStats, ApiError>;
    async fn bots_count(&self) -> Result<u64, ApiError>;
    async fn reports_count(&self) -> Result<u64, ApiError>;
    async fn latest_sales(&self) -> Result<Vec<LatestSale>, ApiError>;
    async fn latest_reports(&self) -> Result<Vec<LatestBugReport>, ApiError>;
}

#[async_trait(?Send)]
pub trait CategoryApi {
    async fn list_categories(&self) -> Result<Vec<BotCategory>, ApiError>;
    async fn list_bots(&self) -> Result<Vec<BotSummary>, ApiError>;
    async fn get_category(&self, id: &str) -> Result<BotCategory, ApiError>;
    async fn create_category(&self, payload: &CategoryPayload) -> Result<(), ApiError>;
    async fn update_category(&self, id: &str, payload: &CategoryPayload) -> Result<(), ApiError>;
    async fn delete_category(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
pub trait BotApi {
    async fn category(&self, id: &str) -> Result<BotCategory, ApiError>;
    async fn save_bot(&self, target: &BotSaveTarget, payload: MultipartPayload) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
pub trait MessageApi {
    async fn message_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, ApiError>;
    async fn send_text(&self, request: &SendTextRequest) -> Result<SendResult, ApiError>;
    async fn send_media(&self, kind: MessageKind, payload: MultipartPayload) -> Result<SendResult, ApiError>;
}

#[async_trait(?Send)]
pub trait AuthApi {
    async fn telegram_login(&self, payload: &TelegramAuthPayload) -> Result<TokenResponse, ApiError>;
}
