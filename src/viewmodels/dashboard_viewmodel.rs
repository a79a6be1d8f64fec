// ============================================================================
// DASHBOARD VIEWMODEL - Widgets independientes + gráfico de ventas
// ============================================================================
// Seis cargas en paralelo; cada una actualiza solo su widget al terminar,
// así un fallo deja el resto intacto. El gráfico vive en un `ChartSlot`.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::{ChartPeriod, LatestBugReport, LatestSale, PaymentStats};
use crate::services::api::DashboardApi;
use crate::services::chart_service::{ChartBackend, ChartSlot};
use crate::state::{ReactiveState, RequestSequencer, WidgetState};

pub const WIDGET_ERROR_TEXT: &str = "Ошибка";
pub const TABLE_ERROR_TEXT: &str = "Ошибка загрузки данных";
pub const EMPTY_TABLE_TEXT: &str = "Нет данных";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardWidgets {
    pub users: WidgetState<u64>,
    pub sales: WidgetState<PaymentStats>,
    pub bots: WidgetState<u64>,
    pub bugs: WidgetState<u64>,
    pub latest_sales: WidgetState<Vec<LatestSale>>,
    pub latest_reports: WidgetState<Vec<LatestBugReport>>,
}

/// Total de ventas: `1234.50 руб.`
pub fn sales_total_text(stats: &PaymentStats) -> String {
    format!("{:.2} руб.", stats.total_sales)
}

/// Resumen bajo el total (una línea por contador)
pub fn sales_summary_lines(stats: &PaymentStats) -> [String; 3] {
    [
        format!("Всего заказов: {}", stats.total_orders),
        format!("Оплачено: {}", stats.paid_orders),
        format!("В ожидании: {}", stats.pending_orders),
    ]
}

/// Texto de un widget escalar
pub fn scalar_text(state: &WidgetState<u64>) -> Option<String> {
    match state {
        WidgetState::Loading => None,
        WidgetState::Ready(count) => Some(count.to_string()),
        WidgetState::Failed(_) => Some(WIDGET_ERROR_TEXT.to_string()),
    }
}

pub struct DashboardViewModel<B: ChartBackend> {
    api: Rc<dyn DashboardApi>,
    widgets: ReactiveState<DashboardWidgets>,
    loads: RequestSequencer,
    chart: RefCell<ChartSlot<B>>,
    period: Cell<ChartPeriod>,
}

impl<B: ChartBackend> DashboardViewModel<B> {
    pub fn new(api: Rc<dyn DashboardApi>, chart_backend: B) -> Self {
        Self {
            api,
            widgets: ReactiveState::new(DashboardWidgets::default()),
            loads: RequestSequencer::new(),
            chart: RefCell::new(ChartSlot::new(chart_backend)),
            period: Cell::new(ChartPeriod::Week),
        }
    }

    pub fn widgets(&self) -> &ReactiveState<DashboardWidgets> {
        &self.widgets
    }

    pub fn period(&self) -> ChartPeriod {
        self.period.get()
    }

    /// Carga (o recarga) todos los widgets y el gráfico del periodo actual
    pub async fn load_all(&self) {
        log::info!("📊 [DASHBOARD] Cargando widgets...");
        let ticket = self.loads.issue();
        self.widgets.set(DashboardWidgets::default());

        // Cada rama escribe su widget en cuanto termina; una recarga posterior
        // deja sin efecto las ramas de la anterior
        let apply = |f: &dyn Fn(&mut DashboardWidgets)| {
            if self.loads.is_latest(ticket) {
                self.widgets.update(|w| f(w));
            }
        };

        futures::join!(
            async {
                let state = WidgetState::from(self.api.users_count().await);
                apply(&|w| w.users = state.clone());
            },
            async {
                let state = WidgetState::from(self.api.payment_stats().await);
                apply(&|w| w.sales = state.clone());
            },
            async {
                let state = WidgetState::from(self.api.bots_count().await);
                apply(&|w| w.bots = state.clone());
            },
            async {
                let state = WidgetState::from(self.api.reports_count().await);
                apply(&|w| w.bugs = state.clone());
            },
            async {
                let state = WidgetState::from(self.api.latest_sales().await);
                apply(&|w| w.latest_sales = state.clone());
            },
            async {
                let state = WidgetState::from(self.api.latest_reports().await);
                apply(&|w| w.latest_reports = state.clone());
            },
        );

        let snapshot = self.widgets.get();
        for (name, failed) in [
            ("users", snapshot.users.is_failed()),
            ("sales", snapshot.sales.is_failed()),
            ("bots", snapshot.bots.is_failed()),
            ("bugs", snapshot.bugs.is_failed()),
            ("latest_sales", snapshot.latest_sales.is_failed()),
            ("latest_reports", snapshot.latest_reports.is_failed()),
        ] {
            if failed {
                log::error!("❌ [DASHBOARD] Widget {} sin datos", name);
            }
        }

        if let Err(e) = self.show_period(self.period.get()) {
            log::error!("❌ [DASHBOARD] Gráfico: {}", e);
        }
    }

    /// Cambia el periodo del gráfico destruyendo antes el gráfico anterior
    pub fn show_period(&self, period: ChartPeriod) -> Result<(), String> {
        self.period.set(period);
        self.chart.borrow_mut().replace(&period.series())
    }
}
