// ============================================================================
// CATEGORIES VIEW - Tabla de categorías y sus modales de alta/edición/borrado
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlFormElement, MouseEvent};

use crate::dom::{
    append_child, get_attribute, get_element_by_id, get_value_by_id, hide_modal, message_row, on_click,
    on_delegated_click, query_selector, set_text_by_id, set_value_by_id, show_modal, text_cell,
    ElementBuilder,
};
use crate::state::WidgetState;
use crate::utils::format::format_number;
use crate::viewmodels::category_viewmodel::{CategoryForm, CategoryRow};
use crate::viewmodels::CategoryViewModel;

const TABLE_ID: &str = "categories-table";
const TABLE_COLUMNS: u32 = 6;
const EMPTY_TEXT: &str = "Нет данных";

fn category_row(row: &CategoryRow) -> Result<Element, JsValue> {
    let id = row.category.id.to_string();
    let edit = ElementBuilder::new("button")?
        .class("btn btn-primary btn-sm edit-category")
        .attr("data-id", &id)?
        .html("<i class=\"fas fa-edit\"></i>")
        .build();
    let delete = ElementBuilder::new("button")?
        .class("btn btn-danger btn-sm delete-category")
        .attr("data-id", &id)?
        .attr("data-name", &row.category.name)?
        .html("<i class=\"fas fa-trash\"></i>")
        .build();
    let actions = ElementBuilder::new("td")?
        .class("text-center")
        .children([edit, delete])?
        .build();

    ElementBuilder::new("tr")?
        .children([
            text_cell(&id)?,
            text_cell(&row.category.name)?,
            text_cell(row.description_text())?,
            text_cell(&format!("{}%", format_number(row.category.discount)))?,
            text_cell(&row.bot_count.to_string())?,
            actions,
        ])
        .map(|b| b.build())
}

fn render(state: &WidgetState<Vec<CategoryRow>>) -> Result<(), JsValue> {
    let Some(body) = query_selector(&format!("#{} tbody", TABLE_ID))? else {
        return Ok(());
    };
    match state {
        // El fallo ya se avisó con una alerta; la tabla queda como estaba
        WidgetState::Loading | WidgetState::Failed(_) => {}
        WidgetState::Ready(rows) if rows.is_empty() => {
            body.set_inner_html("");
            append_child(&body, &message_row(TABLE_COLUMNS, "text-center", EMPTY_TEXT)?)?;
        }
        WidgetState::Ready(rows) => {
            body.set_inner_html("");
            for row in rows {
                append_child(&body, &category_row(row)?)?;
            }
        }
    }
    Ok(())
}

fn read_form(prefix: &str) -> CategoryForm {
    CategoryForm {
        name: get_value_by_id(&format!("{}name", prefix)),
        description: get_value_by_id(&format!("{}description", prefix)),
        discount: get_value_by_id(&format!("{}discount", prefix)),
    }
}

fn reset_form(id: &str) {
    if let Some(form) = get_element_by_id(id).and_then(|el| el.dyn_into::<HtmlFormElement>().ok()) {
        form.reset();
    }
}

fn bind_create(vm: &Rc<CategoryViewModel>) -> Result<(), JsValue> {
    let Some(button) = get_element_by_id("save-category") else {
        return Ok(());
    };
    let vm = vm.clone();
    on_click(&button, move |_e: MouseEvent| {
        let vm = vm.clone();
        let form = read_form("");
        spawn_local(async move {
            if vm.create(&form).await {
                hide_modal("addCategoryModal");
                reset_form("add-category-form");
            }
        });
    })
}

fn open_edit(vm: &Rc<CategoryViewModel>, id: String) {
    let vm = vm.clone();
    spawn_local(async move {
        let Some(category) = vm.fetch_for_edit(&id).await else {
            return;
        };
        let form = CategoryForm::from_category(&category);
        set_value_by_id("edit-id", &category.id.to_string());
        set_value_by_id("edit-name", &form.name);
        set_value_by_id("edit-description", &form.description);
        set_value_by_id("edit-discount", &form.discount);
        show_modal("editCategoryModal");
    });
}

fn bind_update(vm: &Rc<CategoryViewModel>) -> Result<(), JsValue> {
    let Some(button) = get_element_by_id("update-category") else {
        return Ok(());
    };
    let vm = vm.clone();
    on_click(&button, move |_e: MouseEvent| {
        let vm = vm.clone();
        let id = get_value_by_id("edit-id");
        let form = read_form("edit-");
        spawn_local(async move {
            if vm.update(&id, &form).await {
                hide_modal("editCategoryModal");
            }
        });
    })
}

fn bind_delete(vm: &Rc<CategoryViewModel>, pending: Rc<RefCell<Option<String>>>) -> Result<(), JsValue> {
    let Some(button) = get_element_by_id("confirm-delete") else {
        return Ok(());
    };
    let vm = vm.clone();
    on_click(&button, move |_e: MouseEvent| {
        let Some(id) = pending.borrow_mut().take() else {
            return;
        };
        let vm = vm.clone();
        spawn_local(async move {
            vm.delete(&id).await;
            // El modal se cierra tanto si se borró como si no
            hide_modal("deleteCategoryModal");
        });
    })
}

pub fn mount_categories(vm: Rc<CategoryViewModel>) -> Result<bool, JsValue> {
    let Some(table) = get_element_by_id(TABLE_ID) else {
        return Ok(false);
    };

    vm.rows().subscribe(|state| {
        if let Err(e) = render(state) {
            log::error!("❌ [CATEGORIES] Error renderizando: {:?}", e);
        }
    });

    // Las filas se regeneran en cada carga: clicks delegados desde la tabla
    {
        let vm = vm.clone();
        on_delegated_click(&table, ".edit-category", move |button| {
            if let Some(id) = get_attribute(&button, "data-id") {
                open_edit(&vm, id);
            }
        })?;
    }

    let pending_delete = Rc::new(RefCell::new(None::<String>));
    {
        let pending = pending_delete.clone();
        on_delegated_click(&table, ".delete-category", move |button| {
            let name = get_attribute(&button, "data-name").unwrap_or_default();
            set_text_by_id("delete-category-name", &name);
            *pending.borrow_mut() = get_attribute(&button, "data-id");
            show_modal("deleteCategoryModal");
        })?;
    }

    bind_create(&vm)?;
    bind_update(&vm)?;
    bind_delete(&vm, pending_delete)?;

    spawn_local(async move { vm.load().await });
    log::info!("📂 [CATEGORIES] Página montada");
    Ok(true)
}
