// ============================================================================
// DASHBOARD VIEW - Contadores, tablas de últimas ventas/reportes y gráfico
// ============================================================================

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, MouseEvent};

use crate::dom::{
    append_child, add_class, get_attribute, get_element_by_id, message_row, on_click, query_selector,
    query_selector_all, remove_class, set_text_by_id, text_cell, ElementBuilder,
};
use crate::models::{ChartPeriod, LatestBugReport, LatestSale};
use crate::services::chart_service::JsChartBackend;
use crate::state::WidgetState;
use crate::utils::format::{format_datetime, format_price};
use crate::viewmodels::dashboard_viewmodel::{
    sales_summary_lines, sales_total_text, scalar_text, DashboardWidgets, EMPTY_TABLE_TEXT,
    TABLE_ERROR_TEXT, WIDGET_ERROR_TEXT,
};
use crate::viewmodels::DashboardViewModel;

pub type BrowserDashboard = DashboardViewModel<JsChartBackend>;

pub const CHART_CANVAS_ID: &str = "salesChart";
const TABLE_COLUMNS: u32 = 5;

fn render_scalar(id: &str, state: &WidgetState<u64>) {
    if let Some(text) = scalar_text(state) {
        set_text_by_id(id, &text);
    }
}

fn render_sales(widgets: &DashboardWidgets) -> Result<(), JsValue> {
    match &widgets.sales {
        WidgetState::Loading => {}
        WidgetState::Ready(stats) => {
            set_text_by_id("sales-count", &sales_total_text(stats));
            if let Some(info) = get_element_by_id("sales-info") {
                let small = ElementBuilder::new("small")?
                    .html(&sales_summary_lines(stats).join("<br>"))
                    .build();
                info.set_inner_html("");
                info.append_child(&small)?;
            }
        }
        WidgetState::Failed(_) => set_text_by_id("sales-count", WIDGET_ERROR_TEXT),
    }
    Ok(())
}

fn table_body(table_id: &str) -> Option<Element> {
    query_selector(&format!("#{} tbody", table_id)).ok().flatten()
}

fn render_table<T>(
    table_id: &str,
    state: &WidgetState<Vec<T>>,
    row: impl Fn(&T) -> Result<Element, JsValue>,
) -> Result<(), JsValue> {
    let Some(body) = table_body(table_id) else {
        return Ok(());
    };
    match state {
        WidgetState::Loading => {}
        WidgetState::Failed(_) => {
            body.set_inner_html("");
            append_child(&body, &message_row(TABLE_COLUMNS, "text-center text-danger", TABLE_ERROR_TEXT)?)?;
        }
        WidgetState::Ready(items) if items.is_empty() => {
            body.set_inner_html("");
            append_child(&body, &message_row(TABLE_COLUMNS, "text-center", EMPTY_TABLE_TEXT)?)?;
        }
        WidgetState::Ready(items) => {
            body.set_inner_html("");
            for item in items {
                append_child(&body, &row(item)?)?;
            }
        }
    }
    Ok(())
}

fn sale_row(sale: &LatestSale) -> Result<Element, JsValue> {
    ElementBuilder::new("tr")?
        .children([
            text_cell(&sale.id.to_string())?,
            text_cell(&sale.user.display_name())?,
            text_cell(&sale.bot.name)?,
            text_cell(&format_price(sale.amount))?,
            text_cell(&format_datetime(&sale.created_at))?,
        ])
        .map(|b| b.build())
}

fn bug_row(bug: &LatestBugReport) -> Result<Element, JsValue> {
    let (class, label) = bug.status_badge();
    let badge = ElementBuilder::new("span")?.class(class).text(&label).build();
    let status = ElementBuilder::new("td")?.child(badge)?.build();
    ElementBuilder::new("tr")?
        .children([
            text_cell(&bug.id.to_string())?,
            text_cell(&bug.user.display_name())?,
            text_cell(&bug.bot.name)?,
            status,
            text_cell(&format_datetime(&bug.created_at))?,
        ])
        .map(|b| b.build())
}

fn render(widgets: &DashboardWidgets) -> Result<(), JsValue> {
    render_scalar("users-count", &widgets.users);
    render_scalar("bots-count", &widgets.bots);
    render_scalar("bugs-count", &widgets.bugs);
    render_sales(widgets)?;
    render_table("latest-sales-table", &widgets.latest_sales, sale_row)?;
    render_table("latest-bugs-table", &widgets.latest_reports, bug_row)?;
    Ok(())
}

fn load(vm: &Rc<BrowserDashboard>) {
    let vm = vm.clone();
    spawn_local(async move { vm.load_all().await });
}

pub fn mount_dashboard(vm: Rc<BrowserDashboard>) -> Result<bool, JsValue> {
    if get_element_by_id("users-count").is_none() && get_element_by_id(CHART_CANVAS_ID).is_none() {
        return Ok(false);
    }

    vm.widgets().subscribe(|widgets| {
        if let Err(e) = render(widgets) {
            log::error!("❌ [DASHBOARD] Error renderizando: {:?}", e);
        }
    });

    if let Some(refresh) = get_element_by_id("refresh-dashboard") {
        let vm = vm.clone();
        let button = refresh.clone();
        on_click(&refresh, move |_e: MouseEvent| {
            // El icono gira un segundo
            if let Ok(Some(icon)) = button.query_selector("i") {
                let _ = add_class(&icon, "fa-spin");
                Timeout::new(1_000, move || {
                    let _ = remove_class(&icon, "fa-spin");
                })
                .forget();
            }
            load(&vm);
        })?;
    }

    for button in query_selector_all(".btn-group [data-period]")? {
        let vm = vm.clone();
        let this = button.clone();
        on_click(&button, move |_e: MouseEvent| {
            let Some(period) = get_attribute(&this, "data-period").as_deref().and_then(ChartPeriod::parse) else {
                return;
            };
            if let Ok(buttons) = query_selector_all(".btn-group [data-period]") {
                for other in buttons {
                    let _ = remove_class(&other, "active");
                }
            }
            let _ = add_class(&this, "active");
            if let Err(e) = vm.show_period(period) {
                log::error!("❌ [DASHBOARD] Gráfico {}: {}", period.as_str(), e);
            }
        })?;
    }

    load(&vm);
    Ok(true)
}
