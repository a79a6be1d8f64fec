// ============================================================================
// CATEGORY VIEWMODEL - CRUD de categorías con número de bots por categoría
// ============================================================================

use std::rc::Rc;

use crate::models::bot::count_bots_per_category;
use crate::models::{BotCategory, CategoryPayload};
use crate::services::alert_service::AlertLevel;
use crate::services::api::CategoryApi;
use crate::services::errors::ApiError;
use crate::state::{ReactiveState, SessionContext, WidgetState};
use crate::utils::format::parse_number_or_zero;

/// Fila de la tabla de categorías
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category: BotCategory,
    pub bot_count: usize,
}

impl CategoryRow {
    pub fn description_text(&self) -> &str {
        self.category
            .description
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or("-")
    }
}

/// Valores crudos de los inputs del modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    pub discount: String,
}

impl CategoryForm {
    pub fn from_category(category: &BotCategory) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            discount: category.discount.to_string(),
        }
    }

    pub fn to_payload(&self) -> CategoryPayload {
        CategoryPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            discount: parse_number_or_zero(&self.discount),
        }
    }
}

pub struct CategoryViewModel {
    api: Rc<dyn CategoryApi>,
    session: Rc<SessionContext>,
    rows: ReactiveState<WidgetState<Vec<CategoryRow>>>,
}

impl CategoryViewModel {
    pub fn new(api: Rc<dyn CategoryApi>, session: Rc<SessionContext>) -> Self {
        Self {
            api,
            session,
            rows: ReactiveState::new(WidgetState::Loading),
        }
    }

    pub fn rows(&self) -> &ReactiveState<WidgetState<Vec<CategoryRow>>> {
        &self.rows
    }

    fn report(&self, prefix: &str, error: &ApiError) {
        log::error!("❌ [CATEGORIES] {}: {}", prefix, error);
        if !error.is_unauthorized() {
            self.session
                .alert(&format!("{}: {}", prefix, error.user_message()), AlertLevel::Danger);
        }
    }

    /// Carga categorías y, si hay alguna, los bots para contarlos
    pub async fn load(&self) {
        let categories = match self.api.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                self.report("Ошибка при загрузке категорий", &e);
                self.rows.set(WidgetState::Failed(e.to_string()));
                return;
            }
        };

        if categories.is_empty() {
            self.rows.set(WidgetState::Ready(Vec::new()));
            return;
        }

        // Sin la lista de bots los contadores quedan a 0
        let counts = match self.api.list_bots().await {
            Ok(bots) => count_bots_per_category(&bots),
            Err(e) => {
                log::warn!("⚠️ [CATEGORIES] No se pudieron contar los bots: {}", e);
                Default::default()
            }
        };

        let rows = categories
            .into_iter()
            .map(|category| CategoryRow {
                bot_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect::<Vec<_>>();
        log::info!("📂 [CATEGORIES] {} categorías", rows.len());
        self.rows.set(WidgetState::Ready(rows));
    }

    pub async fn create(&self, form: &CategoryForm) -> bool {
        match self.api.create_category(&form.to_payload()).await {
            Ok(()) => {
                self.session.alert("Категория успешно добавлена", AlertLevel::Success);
                self.load().await;
                true
            }
            Err(e) => {
                self.report("Ошибка при добавлении категории", &e);
                false
            }
        }
    }

    /// Datos para el modal de edición
    pub async fn fetch_for_edit(&self, id: &str) -> Option<BotCategory> {
        match self.api.get_category(id).await {
            Ok(category) => Some(category),
            Err(e) => {
                self.report("Ошибка при загрузке данных категории", &e);
                None
            }
        }
    }

    pub async fn update(&self, id: &str, form: &CategoryForm) -> bool {
        match self.api.update_category(id, &form.to_payload()).await {
            Ok(()) => {
                self.session.alert("Категория успешно обновлена", AlertLevel::Success);
                self.load().await;
                true
            }
            Err(e) => {
                self.report("Ошибка при обновлении категории", &e);
                false
            }
        }
    }

    pub async fn delete(&self, id: &str) -> bool {
        match self.api.delete_category(id).await {
            Ok(()) => {
                self.session.alert("Категория успешно удалена", AlertLevel::Success);
                self.load().await;
                true
            }
            Err(e) => {
                self.report("Ошибка при удалении категории", &e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BotSummary;
    use crate::testing::{session_at, Scripted};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeCategories {
        lists: Scripted<Vec<BotCategory>>,
        bots: Scripted<Vec<BotSummary>>,
        writes: Scripted<()>,
        sent: RefCell<Vec<(String, Option<CategoryPayload>)>>,
    }

    #[async_trait(?Send)]
    impl CategoryApi for FakeCategories {
        async fn list_categories(&self) -> Result<Vec<BotCategory>, ApiError> {
            self.lists.next().await
        }

        async fn list_bots(&self) -> Result<Vec<BotSummary>, ApiError> {
            self.bots.next().await
        }

        async fn get_category(&self, id: &str) -> Result<BotCategory, ApiError> {
            Ok(BotCategory { id: id.parse().unwrap_or(0), name: "n".into(), description: None, discount: 5.0 })
        }

        async fn create_category(&self, payload: &CategoryPayload) -> Result<(), ApiError> {
            self.sent.borrow_mut().push(("create".into(), Some(payload.clone())));
            self.writes.next().await
        }

        async fn update_category(&self, id: &str, payload: &CategoryPayload) -> Result<(), ApiError> {
            self.sent.borrow_mut().push((format!("update {}", id), Some(payload.clone())));
            self.writes.next().await
        }

        async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
            self.sent.borrow_mut().push((format!("delete {}", id), None));
            self.writes.next().await
        }
    }

    fn cat(id: i64, name: &str) -> BotCategory {
        BotCategory { id, name: name.into(), description: None, discount: 0.0 }
    }

    fn bot(id: i64, category_id: Option<i64>) -> BotSummary {
        BotSummary { id, name: format!("b{}", id), category_id, price: 0.0, discount: 0.0 }
    }

    #[test]
    fn rows_carry_bot_counts() {
        let api = Rc::new(FakeCategories::default());
        api.lists.push(Ok(vec![cat(1, "Игры"), cat(2, "Магазины")]));
        api.bots.push(Ok(vec![bot(1, Some(1)), bot(2, Some(1)), bot(3, None)]));
        let vm = CategoryViewModel::new(api, session_at("/bots/categories/page").context);

        block_on(vm.load());
        let rows = vm.rows().get();
        let rows = rows.value().unwrap();
        assert_eq!(rows[0].bot_count, 2);
        assert_eq!(rows[1].bot_count, 0);
        assert_eq!(rows[1].description_text(), "-");
    }

    #[test]
    fn empty_list_skips_bot_fetch() {
        let api = Rc::new(FakeCategories::default());
        api.lists.push(Ok(Vec::new()));
        let vm = CategoryViewModel::new(api, session_at("/bots/categories/page").context);
        block_on(vm.load());
        assert_eq!(vm.rows().get(), WidgetState::Ready(Vec::new()));
    }

    #[test]
    fn create_parses_discount_leniently_and_reloads() {
        let api = Rc::new(FakeCategories::default());
        api.writes.push(Ok(()));
        api.lists.push(Ok(vec![cat(1, "Новая")]));
        api.bots.push(Ok(Vec::new()));
        let session = session_at("/bots/categories/page");
        let vm = CategoryViewModel::new(api.clone(), session.context.clone());

        let form = CategoryForm { name: "Новая".into(), description: String::new(), discount: "abc".into() };
        assert!(block_on(vm.create(&form)));
        let sent = api.sent.borrow();
        assert_eq!(sent[0].1.as_ref().map(|p| p.discount), Some(0.0));
        assert_eq!(session.alerts.last(), Some(("Категория успешно добавлена".into(), AlertLevel::Success)));
        assert!(vm.rows().get().is_ready());
    }

    #[test]
    fn delete_failure_reports_detail() {
        let api = Rc::new(FakeCategories::default());
        api.writes.push(Err(ApiError::Server { status: 400, detail: Some("Категория содержит ботов".into()) }));
        let session = session_at("/bots/categories/page");
        let vm = CategoryViewModel::new(api, session.context.clone());

        assert!(!block_on(vm.delete("4")));
        assert_eq!(
            session.alerts.last(),
            Some(("Ошибка при удалении категории: Категория содержит ботов".into(), AlertLevel::Danger))
        );
    }

    #[test]
    fn edit_form_roundtrip() {
        let vm = CategoryViewModel::new(Rc::new(FakeCategories::default()), session_at("/").context);
        let category = block_on(vm.fetch_for_edit("9")).unwrap();
        let form = CategoryForm::from_category(&category);
        assert_eq!(form.discount, "5");
        assert_eq!(form.to_payload().discount, 5.0);
    }
}
