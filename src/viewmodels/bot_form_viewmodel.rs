// ============================================================================
// BOT FORM VIEWMODEL - Precio con descuento, previews y guardado del bot
// ============================================================================
// Todo lo derivado (descuento efectivo, precio final) se recalcula desde
// los inputs en cada cambio; no se cachea nada.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::models::BotSaveTarget;
use crate::services::alert_service::AlertLevel;
use crate::services::api::{BotApi, MultipartPayload};
use crate::state::{RequestSequencer, SessionContext, Ticket};
use crate::utils::constants::{BOTS_LIST_ROUTE, CURRENCY_SUFFIX};
use crate::utils::format::{format_number, format_price};

pub const NO_CATEGORY_TEXT: &str = "Без категории";
pub const NO_ARCHIVE_TEXT: &str = "Не выбран";
pub const NO_FILE_TEXT: &str = "Выберите файл";

/// max(descuento propio, descuento de la categoría)
pub fn effective_discount(item_discount: f64, category_discount: f64) -> f64 {
    item_discount.max(category_discount)
}

pub fn final_price(price: f64, discount: f64) -> f64 {
    price * (1.0 - discount / 100.0)
}

/// Lo que muestra el bloque de precio final del formulario
#[derive(Debug, Clone, PartialEq)]
pub struct PricePreview {
    pub final_price_text: String,
    pub show_discount: bool,
}

impl PricePreview {
    pub fn compute(price: f64, item_discount: f64, category_discount: f64) -> Self {
        let discount = effective_discount(item_discount, category_discount);
        if price > 0.0 && discount > 0.0 {
            Self {
                final_price_text: format_price(final_price(price, discount)),
                show_discount: true,
            }
        } else {
            Self {
                final_price_text: format_price(price),
                show_discount: false,
            }
        }
    }
}

/// Precio del modal de vista previa: HTML (con el original tachado) y etiqueta de descuento
#[derive(Debug, Clone, PartialEq)]
pub struct ModalPrice {
    pub html: String,
    pub discount_label: Option<String>,
}

impl ModalPrice {
    pub fn compute(price: f64, item_discount: f64, category_discount: f64) -> Self {
        let discount = effective_discount(item_discount, category_discount);
        if price > 0.0 && discount > 0.0 {
            Self {
                html: format!(
                    "{} <s class=\"text-muted\">{}</s>",
                    format_price(final_price(price, discount)),
                    format_price(price)
                ),
                discount_label: Some(format!("Скидка {}%", format_number(discount))),
            }
        } else if price > 0.0 {
            Self { html: format_price(price), discount_label: None }
        } else {
            Self { html: format!("0.00 {}", CURRENCY_SUFFIX), discount_label: None }
        }
    }
}

/// Texto de la etiqueta de un input de archivo
pub fn file_label(count: usize, first_name: Option<&str>) -> String {
    match (count, first_name) {
        (0, _) => NO_FILE_TEXT.to_string(),
        (1, Some(name)) => name.rsplit(['\\', '/']).next().unwrap_or(name).to_string(),
        (1, None) => NO_FILE_TEXT.to_string(),
        (n, _) => format!("{} файлов выбрано", n),
    }
}

/// Cuántas previews se pintan y el aviso si se eligieron de más
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPlan {
    pub shown: usize,
    pub warning: Option<String>,
}

pub fn plan_previews(selected: usize, cap: usize) -> PreviewPlan {
    PreviewPlan {
        shown: selected.min(cap),
        warning: (selected > cap).then(|| {
            format!("Вы выбрали {} файлов. Будут загружены только первые {}.", selected, cap)
        }),
    }
}

pub fn category_discount_info(discount: f64) -> String {
    format!("Скидка категории: {}%", format_number(discount))
}

/// Enlace completo al grupo de soporte (`@grupo` → `https://t.me/grupo`)
pub fn support_link(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_start_matches('@');
    (!handle.is_empty()).then(|| format!("https://t.me/{}", handle))
}

pub struct BotFormViewModel {
    api: Rc<dyn BotApi>,
    session: Rc<SessionContext>,
    category_requests: RequestSequencer,
    preview_generations: RequestSequencer,
    carousel_generations: RequestSequencer,
    category_discount: Cell<f64>,
    max_previews: usize,
}

impl BotFormViewModel {
    pub fn new(api: Rc<dyn BotApi>, session: Rc<SessionContext>) -> Self {
        Self {
            api,
            session,
            category_requests: RequestSequencer::new(),
            preview_generations: RequestSequencer::new(),
            carousel_generations: RequestSequencer::new(),
            category_discount: Cell::new(0.0),
            max_previews: CONFIG.max_image_previews,
        }
    }

    pub fn category_discount(&self) -> f64 {
        self.category_discount.get()
    }

    pub fn price_preview(&self, price: f64, item_discount: f64) -> PricePreview {
        PricePreview::compute(price, item_discount, self.category_discount.get())
    }

    /// Cambio de categoría: consulta su descuento. Devuelve el descuento
    /// vigente, o `None` si la respuesta quedó obsoleta o falló
    pub async fn change_category(&self, category_id: Option<&str>) -> Option<f64> {
        let ticket = self.category_requests.issue();
        let Some(id) = category_id.map(str::trim).filter(|id| !id.is_empty()) else {
            self.category_requests.try_apply(ticket);
            self.category_discount.set(0.0);
            return Some(0.0);
        };

        match self.api.category(id).await {
            Ok(category) => {
                // Solo cuenta la última selección del usuario
                if !self.category_requests.is_latest(ticket) || !self.category_requests.try_apply(ticket) {
                    return None;
                }
                let discount = if category.discount > 0.0 { category.discount } else { 0.0 };
                log::info!("🏷️ [BOT-FORM] Categoría {} → descuento {}%", category.id, discount);
                self.category_discount.set(discount);
                Some(discount)
            }
            Err(e) => {
                log::warn!("⚠️ [BOT-FORM] No se pudo cargar la categoría {}: {}", id, e);
                None
            }
        }
    }

    /// Nueva selección de imágenes: invalida lecturas de la selección
    /// anterior y avisa si se eligieron más de las que se previsualizan
    pub fn begin_previews(&self, selected: usize) -> (Ticket, PreviewPlan) {
        let generation = self.preview_generations.issue();
        let plan = plan_previews(selected, self.max_previews);
        if let Some(warning) = &plan.warning {
            self.session.alert(warning, AlertLevel::Warning);
        }
        (generation, plan)
    }

    /// ¿La lectura de esta generación sigue siendo la vigente?
    pub fn is_current_preview(&self, generation: Ticket) -> bool {
        self.preview_generations.is_latest(generation)
    }

    /// Carrusel del modal de vista previa. Generaciones propias para no
    /// invalidar las miniaturas del formulario; el aviso ya se dio al elegir
    pub fn begin_carousel(&self, selected: usize) -> (Ticket, PreviewPlan) {
        let generation = self.carousel_generations.issue();
        (generation, plan_previews(selected, self.max_previews))
    }

    pub fn is_current_carousel(&self, generation: Ticket) -> bool {
        self.carousel_generations.is_latest(generation)
    }

    /// POST `/bots` o PUT `/bots/:id`. Devuelve `true` si se guardó
    pub async fn submit(&self, target: &BotSaveTarget, payload: MultipartPayload) -> bool {
        let is_update = target.is_update();
        match self.api.save_bot(target, payload).await {
            Ok(()) => {
                let text = if is_update { "Бот успешно обновлен!" } else { "Бот успешно создан!" };
                self.session.alert(text, AlertLevel::Success);
                self.session
                    .navigator()
                    .navigate_after(BOTS_LIST_ROUTE, CONFIG.submit_redirect_delay_ms);
                true
            }
            Err(e) => {
                log::error!("❌ [BOT-FORM] Guardado fallido: {}", e);
                if !e.is_unauthorized() {
                    let action = if is_update { "обновлении" } else { "создании" };
                    self.session.alert(
                        &format!("Ошибка при {} бота: {}", action, e.user_message()),
                        AlertLevel::Danger,
                    );
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BotCategory;
    use crate::services::errors::ApiError;
    use crate::testing::{session_at, Scripted};
    use async_trait::async_trait;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeBots {
        categories: Scripted<BotCategory>,
        saves: Scripted<()>,
        saved: RefCell<Vec<BotSaveTarget>>,
    }

    #[async_trait(?Send)]
    impl BotApi for FakeBots {
        async fn category(&self, _id: &str) -> Result<BotCategory, ApiError> {
            self.categories.next().await
        }

        async fn save_bot(&self, target: &BotSaveTarget, _payload: MultipartPayload) -> Result<(), ApiError> {
            self.saved.borrow_mut().push(target.clone());
            self.saves.next().await
        }
    }

    fn category(id: i64, discount: f64) -> BotCategory {
        BotCategory { id, name: format!("c{}", id), description: None, discount }
    }

    #[test]
    fn effective_discount_is_the_max() {
        for item in [0.0, 10.0, 50.0, 100.0] {
            for cat in [0.0, 5.0, 50.0, 100.0] {
                assert_eq!(effective_discount(item, cat), f64::max(item, cat));
            }
        }
        assert_eq!(final_price(1000.0, 15.0), 850.0);
        assert_eq!(final_price(1000.0, 100.0), 0.0);
    }

    #[test]
    fn price_preview_hides_discount_without_price_or_discount() {
        let preview = PricePreview::compute(1000.0, 10.0, 25.0);
        assert_eq!(preview.final_price_text, "750.00 ₽");
        assert!(preview.show_discount);

        let preview = PricePreview::compute(1000.0, 0.0, 0.0);
        assert_eq!(preview.final_price_text, "1000.00 ₽");
        assert!(!preview.show_discount);

        let preview = PricePreview::compute(0.0, 30.0, 0.0);
        assert_eq!(preview.final_price_text, "0.00 ₽");
        assert!(!preview.show_discount);
    }

    #[test]
    fn modal_price_strikes_original() {
        let modal = ModalPrice::compute(200.0, 12.5, 0.0);
        assert_eq!(modal.html, "175.00 ₽ <s class=\"text-muted\">200.00 ₽</s>");
        assert_eq!(modal.discount_label.as_deref(), Some("Скидка 12.5%"));
        assert_eq!(ModalPrice::compute(200.0, 0.0, 0.0).html, "200.00 ₽");
        assert_eq!(ModalPrice::compute(-5.0, 10.0, 0.0).html, "0.00 ₽");
    }

    #[test]
    fn file_labels() {
        assert_eq!(file_label(0, None), "Выберите файл");
        assert_eq!(file_label(1, Some("C:\\fakepath\\bot.zip")), "bot.zip");
        assert_eq!(file_label(1, Some("logo.png")), "logo.png");
        assert_eq!(file_label(3, Some("a.png")), "3 файлов выбрано");
    }

    #[test]
    fn more_than_five_images_render_five_and_warn_once() {
        let session = session_at("/bots/create");
        let vm = BotFormViewModel::new(Rc::new(FakeBots::default()), session.context.clone());
        let (_, plan) = vm.begin_previews(8);
        assert_eq!(plan.shown, 5);
        assert_eq!(
            session.alerts.messages(),
            vec![(
                "Вы выбрали 8 файлов. Будут загружены только первые 5.".to_string(),
                AlertLevel::Warning
            )]
        );

        let (_, plan) = vm.begin_previews(3);
        assert_eq!(plan, PreviewPlan { shown: 3, warning: None });
        assert_eq!(session.alerts.messages().len(), 1);
    }

    #[test]
    fn new_selection_invalidates_older_previews() {
        let vm = BotFormViewModel::new(Rc::new(FakeBots::default()), session_at("/bots/create").context);
        let (first, _) = vm.begin_previews(2);
        let (second, _) = vm.begin_previews(2);
        assert!(!vm.is_current_preview(first));
        assert!(vm.is_current_preview(second));
    }

    #[test]
    fn modal_carousel_keeps_form_tiles_and_single_warning() {
        let session = session_at("/bots/create");
        let vm = BotFormViewModel::new(Rc::new(FakeBots::default()), session.context.clone());
        let (form, _) = vm.begin_previews(8);
        let (carousel, plan) = vm.begin_carousel(8);

        assert_eq!(plan.shown, 5);
        assert!(vm.is_current_preview(form));
        assert!(vm.is_current_carousel(carousel));
        assert_eq!(session.alerts.messages().len(), 1);

        // Reabrir el modal solo invalida el carrusel anterior
        let (reopened, _) = vm.begin_carousel(8);
        assert!(!vm.is_current_carousel(carousel));
        assert!(vm.is_current_carousel(reopened));
        assert!(vm.is_current_preview(form));
        assert_eq!(session.alerts.messages().len(), 1);
    }

    #[test]
    fn category_change_sets_discount() {
        let api = Rc::new(FakeBots::default());
        api.categories.push(Ok(category(1, 20.0)));
        api.categories.push(Ok(category(2, 0.0)));
        let vm = BotFormViewModel::new(api, session_at("/bots/create").context);

        assert_eq!(block_on(vm.change_category(Some("1"))), Some(20.0));
        assert_eq!(vm.price_preview(100.0, 5.0).final_price_text, "80.00 ₽");
        assert_eq!(block_on(vm.change_category(Some("2"))), Some(0.0));
        assert_eq!(block_on(vm.change_category(Some(""))), Some(0.0));
        assert_eq!(vm.category_discount(), 0.0);
    }

    #[test]
    fn slow_category_response_is_ignored() {
        let api = Rc::new(FakeBots::default());
        let slow = api.categories.defer();
        let fast = api.categories.defer();
        let vm = Rc::new(BotFormViewModel::new(api, session_at("/bots/create").context));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        for id in ["1", "2"] {
            let vm = vm.clone();
            spawner
                .spawn_local(async move {
                    vm.change_category(Some(id)).await;
                })
                .unwrap();
        }
        pool.run_until_stalled();
        fast.send(Ok(category(2, 10.0))).unwrap();
        pool.run_until_stalled();
        slow.send(Ok(category(1, 40.0))).unwrap();
        pool.run_until_stalled();

        assert_eq!(vm.category_discount(), 10.0);
    }

    #[test]
    fn submit_success_redirects_after_delay() {
        let api = Rc::new(FakeBots::default());
        api.saves.push(Ok(()));
        let session = session_at("/bots/edit/3");
        let vm = BotFormViewModel::new(api.clone(), session.context.clone());

        let target = BotSaveTarget::Update("3".into());
        assert!(block_on(vm.submit(&target, MultipartPayload::default())));
        assert_eq!(*api.saved.borrow(), vec![target]);
        assert_eq!(session.alerts.last(), Some(("Бот успешно обновлен!".to_string(), AlertLevel::Success)));
        assert_eq!(
            session.navigator.delayed(),
            vec![("/bots/page".to_string(), CONFIG.submit_redirect_delay_ms)]
        );
    }

    #[test]
    fn submit_failure_shows_server_detail_or_fallback() {
        let api = Rc::new(FakeBots::default());
        api.saves.push(Err(ApiError::Server { status: 400, detail: Some("Имя занято".into()) }));
        api.saves.push(Err(ApiError::Network("offline".into())));
        let session = session_at("/bots/create");
        let vm = BotFormViewModel::new(api, session.context.clone());

        assert!(!block_on(vm.submit(&BotSaveTarget::Create, MultipartPayload::default())));
        assert_eq!(
            session.alerts.last(),
            Some(("Ошибка при создании бота: Имя занято".to_string(), AlertLevel::Danger))
        );
        assert!(!block_on(vm.submit(&BotSaveTarget::Create, MultipartPayload::default())));
        assert_eq!(
            session.alerts.last(),
            Some(("Ошибка при создании бота: Неизвестная ошибка".to_string(), AlertLevel::Danger))
        );
        assert!(session.navigator.delayed().is_empty());
    }

    #[test]
    fn support_links() {
        assert_eq!(support_link("@my_group").as_deref(), Some("https://t.me/my_group"));
        assert_eq!(support_link("  "), None);
    }
}
