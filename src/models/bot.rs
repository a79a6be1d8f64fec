use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Categoría de bots (`/bots/categories`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount: f64,
}

/// Cuerpo JSON para crear/actualizar una categoría
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: String,
    pub discount: f64,
}

/// Bot tal como lo devuelve `GET /bots` (solo lo que usa la consola)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

/// Destino del guardado del formulario de bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotSaveTarget {
    Create,
    Update(String),
}

impl BotSaveTarget {
    /// Con `#bot-id` no vacío se edita, si no se crea
    pub fn from_bot_id(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::Update(id.to_string()),
            None => Self::Create,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }
}

/// Número de bots por categoría
pub fn count_bots_per_category(bots: &[BotSummary]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for category_id in bots.iter().filter_map(|bot| bot.category_id) {
        *counts.entry(category_id).or_insert(0) += 1;
    }
    counts
}
