use serde::{Deserialize, Serialize};

/// Respuesta de `GET /notifications`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NotificationFeed {
    #[serde(rename = "unreadCount", default)]
    pub unread_count: u32,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/// Notificación ya tipada: los campos que dependen del tipo viven en `kind`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNotification")]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: String,
    pub created_at: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    Order { status: OrderStatus },
    BugReport { status: BugStatus },
    Review { rating: f64 },
    Message,
    Unknown { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    Pending,
    Cancelled,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "paid" => Self::Paid,
            "pending" => Self::Pending,
            "cancelled" => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    New,
    InProgress,
    Resolved,
    #[serde(other)]
    Other,
}

impl BugStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "new" => Self::New,
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            _ => Self::Other,
        }
    }
}

/// Variante de color de Bootstrap para el icono de la notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Success,
    Warning,
    Danger,
    Primary,
    Info,
    Secondary,
}

impl BadgeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Info => "info",
            Self::Secondary => "secondary",
        }
    }

    /// Clase CSS de fondo (`bg-success`, ...)
    pub fn background_class(&self) -> String {
        format!("bg-{}", self.as_str())
    }
}

impl NotificationKind {
    /// Tabla fija de clasificación tipo/estado → color
    pub fn badge(&self) -> BadgeVariant {
        match self {
            Self::Order { status } => match status {
                OrderStatus::Paid => BadgeVariant::Success,
                OrderStatus::Pending => BadgeVariant::Warning,
                _ => BadgeVariant::Secondary,
            },
            Self::BugReport { status } => match status {
                BugStatus::New => BadgeVariant::Danger,
                BugStatus::InProgress => BadgeVariant::Primary,
                BugStatus::Resolved => BadgeVariant::Success,
                // Cualquier otro estado cuenta como cerrado
                BugStatus::Other => BadgeVariant::Success,
            },
            Self::Review { rating } if *rating >= 4.0 => BadgeVariant::Success,
            Self::Review { rating } if *rating >= 2.0 => BadgeVariant::Warning,
            Self::Review { .. } => BadgeVariant::Danger,
            Self::Message => BadgeVariant::Info,
            Self::Unknown { .. } => BadgeVariant::Secondary,
        }
    }
}

impl Notification {
    pub fn badge(&self) -> BadgeVariant {
        self.kind.badge()
    }
}

// Forma cruda del JSON; la conversión a `Notification` es el único sitio
// donde se interpretan `type`/`status`/`rating`
#[derive(Deserialize)]
struct RawNotification {
    #[serde(default)]
    id: i64,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    message: String,
    #[serde(default = "default_link")]
    link: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    icon: String,
}

fn default_link() -> String {
    "#".to_string()
}

impl From<RawNotification> for Notification {
    fn from(raw: RawNotification) -> Self {
        let status = raw.status.unwrap_or_default();
        let kind = match raw.kind.as_str() {
            "order" => NotificationKind::Order {
                status: OrderStatus::parse(&status),
            },
            "bug_report" => NotificationKind::BugReport {
                status: BugStatus::parse(&status),
            },
            "review" => NotificationKind::Review {
                rating: raw.rating.unwrap_or(0.0),
            },
            "message" => NotificationKind::Message,
            other => NotificationKind::Unknown {
                kind: other.to_string(),
            },
        };

        Self {
            id: raw.id,
            kind,
            title: raw.title,
            message: raw.message,
            link: raw.link,
            created_at: raw.created_at,
            icon: raw.icon,
        }
    }
}
