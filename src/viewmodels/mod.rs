pub mod session_viewmodel;
pub mod notification_viewmodel;
pub mod dashboard_viewmodel;
pub mod bot_form_viewmodel;
pub mod category_viewmodel;
pub mod message_viewmodel;

pub use session_viewmodel::SessionViewModel;
pub use notification_viewmodel::NotificationViewModel;
pub use dashboard_viewmodel::DashboardViewModel;
pub use bot_form_viewmodel::BotFormViewModel;
pub use category_viewmodel::CategoryViewModel;
pub use message_viewmodel::MessageViewModel;
