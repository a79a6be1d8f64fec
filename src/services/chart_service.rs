// ============================================================================
// CHART SERVICE - Gráfico de ventas sobre Chart.js (FFI) + ciclo de vida
// ============================================================================
// El dashboard es dueño de un único `ChartSlot`: antes de construir un
// gráfico nuevo sobre el canvas se destruye el anterior.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::dom::get_element_by_id;
use crate::models::ChartSeries;

#[wasm_bindgen]
extern "C" {
    /// `window.Chart` cargado por la plantilla
    #[wasm_bindgen(js_name = Chart)]
    pub type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(context: &JsValue, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);
}

/// Motor de gráficos (Chart.js en el navegador, fake en tests)
pub trait ChartBackend {
    type Handle;

    fn create(&self, series: &ChartSeries) -> Result<Self::Handle, String>;
    fn destroy(&self, handle: Self::Handle);
}

/// Hueco de gráfico: como mucho una instancia viva a la vez
pub struct ChartSlot<B: ChartBackend> {
    backend: B,
    current: Option<B::Handle>,
}

impl<B: ChartBackend> ChartSlot<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, current: None }
    }

    /// Reemplaza el gráfico actual. El anterior se destruye siempre,
    /// también si la creación del nuevo falla.
    pub fn replace(&mut self, series: &ChartSeries) -> Result<(), String> {
        if let Some(previous) = self.current.take() {
            self.backend.destroy(previous);
        }
        let handle = self.backend.create(series)?;
        self.current = Some(handle);
        Ok(())
    }

    pub fn has_chart(&self) -> bool {
        self.current.is_some()
    }
}

/// Chart.js real sobre `<canvas id=...>`
pub struct JsChartBackend {
    canvas_id: String,
}

impl JsChartBackend {
    pub fn new(canvas_id: &str) -> Self {
        Self { canvas_id: canvas_id.to_string() }
    }

    fn build_config(series: &ChartSeries) -> Result<JsValue, JsValue> {
        let config = serde_json::json!({
            "type": "line",
            "data": {
                "labels": series.labels,
                "datasets": [{
                    "label": "Продажи (руб.)",
                    "data": series.values,
                    "backgroundColor": "rgba(78, 115, 223, 0.2)",
                    "borderColor": "rgba(78, 115, 223, 1)",
                    "borderWidth": 2,
                    "tension": 0.3,
                    "pointRadius": 3,
                    "pointBackgroundColor": "rgba(78, 115, 223, 1)",
                    "pointBorderColor": "#fff",
                    "pointHoverRadius": 5,
                    "pointHoverBackgroundColor": "rgba(78, 115, 223, 1)",
                    "pointHoverBorderColor": "#fff"
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "y": { "beginAtZero": true, "ticks": {} } },
                "plugins": { "tooltip": { "callbacks": {} } }
            }
        });
        let config = js_sys::JSON::parse(&config.to_string())?;

        // Los callbacks de formato no son serializables: se inyectan aparte
        let tick = js_sys::Function::new_with_args("value", "return value.toLocaleString() + ' ₽';");
        let tooltip = js_sys::Function::new_with_args(
            "context",
            "return context.parsed.y.toLocaleString() + ' ₽';",
        );
        let ticks = get_path(&config, &["options", "scales", "y", "ticks"])?;
        js_sys::Reflect::set(&ticks, &"callback".into(), &tick)?;
        let callbacks = get_path(&config, &["options", "plugins", "tooltip", "callbacks"])?;
        js_sys::Reflect::set(&callbacks, &"label".into(), &tooltip)?;
        Ok(config)
    }

    fn try_create(&self, series: &ChartSeries) -> Result<ChartJs, JsValue> {
        let canvas = get_element_by_id(&self.canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
        let config = Self::build_config(series)?;
        ChartJs::new(&context, &config)
    }
}

fn get_path(root: &JsValue, path: &[&str]) -> Result<JsValue, JsValue> {
    path.iter()
        .try_fold(root.clone(), |node, key| js_sys::Reflect::get(&node, &JsValue::from_str(key)))
}

impl ChartBackend for JsChartBackend {
    type Handle = ChartJs;

    fn create(&self, series: &ChartSeries) -> Result<ChartJs, String> {
        log::info!("📈 [DASHBOARD] Gráfico de ventas: {}", series.period.as_str());
        self.try_create(series).map_err(|e| format!("{:?}", e))
    }

    fn destroy(&self, handle: ChartJs) {
        handle.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartPeriod;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        next_id: Cell<u32>,
        alive: RefCell<Vec<u32>>,
        fail_next: Cell<bool>,
    }

    struct FakeBackend(Rc<Counters>);

    impl ChartBackend for FakeBackend {
        type Handle = u32;

        fn create(&self, _series: &ChartSeries) -> Result<u32, String> {
            if self.0.fail_next.replace(false) {
                return Err("Chart is not defined".into());
            }
            let id = self.0.next_id.get() + 1;
            self.0.next_id.set(id);
            self.0.alive.borrow_mut().push(id);
            Ok(id)
        }

        fn destroy(&self, handle: u32) {
            self.0.alive.borrow_mut().retain(|id| *id != handle);
        }
    }

    #[test]
    fn switching_periods_never_accumulates_charts() {
        let counters = Rc::new(Counters::default());
        let mut slot = ChartSlot::new(FakeBackend(counters.clone()));
        for period in [ChartPeriod::Week, ChartPeriod::Month, ChartPeriod::Year, ChartPeriod::Week] {
            slot.replace(&period.series()).unwrap();
            assert_eq!(counters.alive.borrow().len(), 1);
        }
        assert_eq!(*counters.alive.borrow(), vec![4]);
    }

    #[test]
    fn failed_creation_still_destroys_previous() {
        let counters = Rc::new(Counters::default());
        let mut slot = ChartSlot::new(FakeBackend(counters.clone()));
        slot.replace(&ChartPeriod::Week.series()).unwrap();
        counters.fail_next.set(true);
        assert!(slot.replace(&ChartPeriod::Month.series()).is_err());
        assert!(counters.alive.borrow().is_empty());
        assert!(!slot.has_chart());
    }
}
