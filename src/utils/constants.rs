/// Clave de localStorage donde vive el token de acceso
pub const TOKEN_STORAGE_KEY: &str = "token";

// Rutas del cliente
pub const LOGIN_ROUTE: &str = "/";
pub const AUTH_ROUTE_PREFIX: &str = "/auth";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const BOTS_LIST_ROUTE: &str = "/bots/page";

// Endpoints del API
pub const USERS_COUNT_PATH: &str = "/users/count";
pub const PAYMENTS_STATS_PATH: &str = "/payments/stats";
pub const PAYMENTS_LATEST_PATH: &str = "/payments/latest";
pub const BOTS_PATH: &str = "/bots";
pub const BOTS_COUNT_PATH: &str = "/bots/count";
pub const CATEGORIES_PATH: &str = "/bots/categories";
pub const REPORTS_COUNT_PATH: &str = "/reports/count";
pub const REPORTS_LATEST_PATH: &str = "/reports/latest";
pub const MESSAGE_HISTORY_PATH: &str = "/messages/message-history";
pub const NOTIFICATIONS_PATH: &str = "/notifications";
pub const NOTIFICATIONS_MARK_READ_PATH: &str = "/notifications/mark-read";
pub const TELEGRAM_LOGIN_PATH: &str = "/auth/telegram-login";

/// Texto genérico cuando el servidor no manda `detail`
pub const UNKNOWN_ERROR_TEXT: &str = "Неизвестная ошибка";

/// Sufijo de moneda en precios
pub const CURRENCY_SUFFIX: &str = "₽";
