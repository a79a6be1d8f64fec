pub mod auth;
pub mod bot;
pub mod dashboard;
pub mod message;
pub mod notification;

pub use auth::{ErrorBody, TelegramAuthPayload, TokenResponse};
pub use bot::{BotCategory, BotSaveTarget, BotSummary, CategoryPayload};
pub use dashboard::{ChartPeriod, ChartSeries, CountResponse, LatestBugReport, LatestSale, PaymentStats};
pub use message::{ChatMessage, MessageKind, ParseMode, SendResult, SendTextRequest};
pub use notification::{BadgeVariant, Notification, NotificationFeed, NotificationKind};
