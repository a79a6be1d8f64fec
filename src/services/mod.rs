// ============================================================================
// SERVICES - HTTP y adaptadores del navegador (sin lógica de UI)
// ============================================================================

pub mod errors;
pub mod api;
pub mod api_client;
pub mod alert_service;
pub mod chart_service;
pub mod navigator;

pub use api::*;
pub use api_client::ApiClient;
pub use alert_service::{AlertLevel, AlertSink, DomAlertSink};
pub use chart_service::{ChartBackend, ChartSlot, JsChartBackend};
pub use errors::ApiError;
pub use navigator::{BrowserNavigator, Navigator};
