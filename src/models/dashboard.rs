use serde::{Deserialize, Serialize};

use crate::models::notification::BugStatus;

/// `{ "count": N }` de los endpoints `/…/count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Estadística de pagos (`GET /payments/stats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub total_sales: f64,
    pub total_orders: u64,
    pub paid_orders: u64,
    pub pending_orders: u64,
    #[serde(default)]
    pub cancelled_orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl UserRef {
    /// username → first_name → `ID: n`
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.first_name.as_deref().filter(|name| !name.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("ID: {}", self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRef {
    pub id: i64,
    pub name: String,
}

/// Fila de `GET /payments/latest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSale {
    pub id: i64,
    pub user: UserRef,
    pub bot: BotRef,
    pub amount: f64,
    pub created_at: String,
}

/// Fila de `GET /reports/latest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestBugReport {
    pub id: i64,
    pub user: UserRef,
    pub bot: BotRef,
    pub status: String,
    pub created_at: String,
}

impl LatestBugReport {
    /// Clase del badge y etiqueta visible para el estado del reporte
    pub fn status_badge(&self) -> (&'static str, String) {
        match BugStatus::parse(&self.status) {
            BugStatus::New => ("badge badge-warning", "Новый".to_string()),
            BugStatus::InProgress => ("badge badge-info", "В работе".to_string()),
            BugStatus::Resolved => ("badge badge-success", "Решен".to_string()),
            BugStatus::Other => ("badge badge-secondary", self.status.clone()),
        }
    }
}

/// Periodo del gráfico de ventas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPeriod {
    Week,
    Month,
    Year,
}

impl ChartPeriod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Serie de ventas del periodo.
    ///
    /// Tabla fija de demostración: el backend todavía no expone un
    /// endpoint de agregación por periodo.
    pub fn series(&self) -> ChartSeries {
        let (labels, values): (&[&str], &[f64]) = match self {
            Self::Week => (
                &["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"],
                &[5000.0, 3000.0, 4500.0, 2500.0, 6000.0, 7000.0, 4000.0],
            ),
            Self::Month => (
                &["Неделя 1", "Неделя 2", "Неделя 3", "Неделя 4"],
                &[15000.0, 20000.0, 18000.0, 25000.0],
            ),
            Self::Year => (
                &["Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек"],
                &[
                    30000.0, 25000.0, 40000.0, 35000.0, 42000.0, 48000.0, 50000.0, 55000.0, 45000.0,
                    60000.0, 70000.0, 75000.0,
                ],
            ),
        };

        ChartSeries {
            period: *self,
            labels: labels.iter().map(|label| label.to_string()).collect(),
            values: values.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub period: ChartPeriod,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}
