// ============================================================================
// VIEWS - Enlace con el DOM que ya renderizan las plantillas del servidor
// ============================================================================
// Cada `mount_*` busca su elemento raíz; si la página no lo tiene devuelve
// `Ok(false)` sin tocar nada.
// ============================================================================

pub mod nav;
pub mod notifications;
pub mod dashboard;
pub mod bot_form;
pub mod categories;
pub mod messages;
pub mod login;

pub use nav::mount_nav;
pub use notifications::mount_notifications;
pub use dashboard::{mount_dashboard, BrowserDashboard, CHART_CANVAS_ID};
pub use bot_form::mount_bot_form;
pub use categories::mount_categories;
pub use messages::{mount_messages, page_user_id};
pub use login::mount_login;
