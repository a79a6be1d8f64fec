// ============================================================================
// BOT FORM VIEW - Formulario de creación/edición de bots
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement, MouseEvent};

use crate::dom::{
    get_element_by_id, get_value_by_id, hide_modal, input_by_id, on_change, on_click, on_input,
    on_submit, query_selector, query_selector_all, read_as_data_url, selected_files,
    set_text_by_id, set_value_by_id, set_visible, set_visible_by_id, show_modal, ElementBuilder,
};
use crate::models::BotSaveTarget;
use crate::services::api::MultipartPayload;
use crate::state::Ticket;
use crate::utils::format::parse_number_or_zero;
use crate::viewmodels::bot_form_viewmodel::{
    category_discount_info, file_label, support_link, ModalPrice, NO_ARCHIVE_TEXT, NO_CATEGORY_TEXT,
};
use crate::viewmodels::BotFormViewModel;

const IMAGES_INPUT_ID: &str = "bot-images";
const PREVIEW_MODAL_ID: &str = "previewModal";

fn find_form() -> Option<HtmlFormElement> {
    ["create-bot-form", "edit-bot-form"]
        .iter()
        .find_map(|id| get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
}

fn number(id: &str) -> f64 {
    parse_number_or_zero(&get_value_by_id(id))
}

/// Recalcula el bloque de precio final desde los inputs
fn update_final_price(vm: &BotFormViewModel) {
    let preview = vm.price_preview(number("price"), number("discount"));
    set_text_by_id("final-price", &preview.final_price_text);
    set_visible_by_id("price-container", preview.show_discount);
}

fn apply_category_discount(discount: f64) {
    set_value_by_id("category-discount", &discount.to_string());
    if discount > 0.0 {
        set_text_by_id("category-discount-info", &category_discount_info(discount));
        set_visible_by_id("category-discount-info", true);
    } else {
        set_visible_by_id("category-discount-info", false);
    }
}

fn change_category(vm: &Rc<BotFormViewModel>) {
    let vm = vm.clone();
    let category_id = get_value_by_id("category_id");
    spawn_local(async move {
        if let Some(discount) = vm.change_category(Some(&category_id)).await {
            apply_category_discount(discount);
            update_final_price(&vm);
        }
    });
}

fn image_tile(index: usize) -> Result<Element, JsValue> {
    let img = ElementBuilder::new("img")?
        .class("img-thumbnail")
        .attr("style", "max-height: 100px; max-width: 150px;")?
        .build();
    let remove = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-sm btn-danger position-absolute")
        .attr("style", "top: 0; right: 0;")?
        .html("<i class=\"fas fa-times\"></i>")
        .build();
    let order = ElementBuilder::new("input")?
        .attr("type", "hidden")?
        .attr("name", "image_order[]")?
        .attr("value", &index.to_string())?
        .build();
    let tile = ElementBuilder::new("div")?
        .class("image-item m-2 position-relative")
        .children([img, remove.clone(), order])?
        .build();
    let this = tile.clone();
    on_click(&remove, move |_e: MouseEvent| this.remove())?;
    Ok(tile)
}

/// Pinta `src` en la imagen de cada hueco cuando termina su lectura
fn fill_previews(
    vm: &Rc<BotFormViewModel>,
    generation: Ticket,
    is_current: fn(&BotFormViewModel, Ticket) -> bool,
    slots: Vec<(web_sys::File, Element)>,
) {
    for (file, slot) in slots {
        let vm = vm.clone();
        spawn_local(async move {
            match read_as_data_url(&file).await {
                Ok(url) => {
                    // Lecturas de una selección anterior se descartan
                    if !is_current(&*vm, generation) {
                        return;
                    }
                    if let Ok(Some(img)) = slot.query_selector("img") {
                        let _ = img.set_attribute("src", &url);
                    }
                }
                Err(e) => log::warn!("⚠️ [BOT-FORM] No se pudo leer {}: {:?}", file.name(), e),
            }
        });
    }
}

fn on_images_selected(vm: &Rc<BotFormViewModel>, input: &HtmlInputElement) -> Result<(), JsValue> {
    let Some(container) = get_element_by_id("image-preview") else {
        return Ok(());
    };
    container.set_inner_html("");
    let files = selected_files(input);
    let (generation, plan) = vm.begin_previews(files.len());

    // Huecos reservados en orden de selección antes de leer nada
    let mut slots = Vec::with_capacity(plan.shown);
    for (index, file) in files.into_iter().take(plan.shown).enumerate() {
        let tile = image_tile(index)?;
        container.append_child(&tile)?;
        slots.push((file, tile));
    }
    fill_previews(vm, generation, BotFormViewModel::is_current_preview, slots);
    Ok(())
}

fn bind_file_labels(vm: &Rc<BotFormViewModel>) -> Result<(), JsValue> {
    for element in query_selector_all(".custom-file-input")? {
        let vm = vm.clone();
        on_change(&element, move |e: Event| {
            let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
                return;
            };
            let files = selected_files(&input);
            let first = files.first().map(|file| file.name());
            if let Some(label) = input.next_element_sibling() {
                if label.class_list().contains("custom-file-label") {
                    label.set_text_content(Some(&file_label(files.len(), first.as_deref())));
                }
            }
            if input.id() == IMAGES_INPUT_ID {
                if let Err(err) = on_images_selected(&vm, &input) {
                    log::error!("❌ [BOT-FORM] Previews: {:?}", err);
                }
            }
        })?;
    }
    Ok(())
}

fn carousel_item(index: usize) -> Result<Element, JsValue> {
    let class = if index == 0 { "carousel-item active" } else { "carousel-item" };
    let img = ElementBuilder::new("img")?
        .class("d-block w-100")
        .attr("alt", &format!("Изображение {}", index + 1))?
        .build();
    Ok(ElementBuilder::new("div")?.class(class).child(img)?.build())
}

/// Rellena el modal de vista previa con los valores actuales del formulario
fn prepare_preview(vm: &Rc<BotFormViewModel>) -> Result<(), JsValue> {
    set_text_by_id("preview-name", &get_value_by_id("name"));

    let category_text = get_element_by_id("category_id")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        .filter(|select| !select.value().is_empty())
        .and_then(|select| {
            let index = u32::try_from(select.selected_index()).ok()?;
            select.options().item(index)
        })
        .and_then(|option| option.text_content())
        .unwrap_or_else(|| NO_CATEGORY_TEXT.to_string());
    set_text_by_id("preview-category", &category_text);

    let price = ModalPrice::compute(number("price"), number("discount"), vm.category_discount());
    if let Some(el) = get_element_by_id("preview-price") {
        el.set_inner_html(&price.html);
    }
    match &price.discount_label {
        Some(label) => {
            set_text_by_id("preview-discount", label);
            set_visible_by_id("preview-discount", true);
        }
        None => set_visible_by_id("preview-discount", false),
    }

    if let Some(el) = get_element_by_id("preview-description") {
        el.set_inner_html(&get_value_by_id("description"));
    }
    if let Some(el) = get_element_by_id("preview-readme") {
        el.set_inner_html(&get_value_by_id("readme_content"));
    }

    if let Some(link) = get_element_by_id("preview-support") {
        let parent = link.parent_element();
        match support_link(&get_value_by_id("support_group_link")) {
            Some(url) => {
                link.set_text_content(Some(&url));
                link.set_attribute("href", &url)?;
                if let Some(parent) = parent {
                    set_visible(&parent, true);
                }
            }
            None => {
                if let Some(parent) = parent {
                    set_visible(&parent, false);
                }
            }
        }
    }

    let archive = input_by_id("archive_file")
        .and_then(|input| selected_files(&input).into_iter().next())
        .map(|file| file.name())
        .unwrap_or_else(|| NO_ARCHIVE_TEXT.to_string());
    set_text_by_id("preview-archive", &archive);

    if let Some(inner) = query_selector("#preview-carousel .carousel-inner")? {
        inner.set_inner_html("");
        let images = input_by_id(IMAGES_INPUT_ID).map(|input| selected_files(&input)).unwrap_or_default();
        if images.is_empty() {
            inner.set_inner_html(
                "<div class=\"carousel-item active\"><div class=\"d-flex justify-content-center \
                 align-items-center bg-light\" style=\"height: 300px;\"><p class=\"text-muted\">\
                 Нет изображений</p></div></div>",
            );
        } else {
            let (generation, plan) = vm.begin_carousel(images.len());
            let mut slots = Vec::with_capacity(plan.shown);
            for (index, file) in images.into_iter().take(plan.shown).enumerate() {
                let item = carousel_item(index)?;
                inner.append_child(&item)?;
                slots.push((file, item));
            }
            fill_previews(vm, generation, BotFormViewModel::is_current_carousel, slots);
        }
    }
    Ok(())
}

fn submit(vm: &Rc<BotFormViewModel>) {
    let Some(form) = find_form() else {
        log::error!("❌ [BOT-FORM] Formulario no encontrado");
        return;
    };
    let bot_id = (form.id() == "edit-bot-form").then(|| get_value_by_id("bot-id"));
    let target = BotSaveTarget::from_bot_id(bot_id.as_deref());

    let mut payload = MultipartPayload::from_form(form);
    if let Some(input) = input_by_id(IMAGES_INPUT_ID) {
        for file in selected_files(&input) {
            payload = payload.file("media_files", file);
        }
    }

    let vm = vm.clone();
    spawn_local(async move {
        vm.submit(&target, payload).await;
    });
}

pub fn mount_bot_form(vm: Rc<BotFormViewModel>) -> Result<bool, JsValue> {
    let Some(form) = find_form() else {
        return Ok(false);
    };

    for id in ["price", "discount"] {
        if let Some(input) = get_element_by_id(id) {
            let vm = vm.clone();
            on_input(&input, move |_e: Event| update_final_price(&vm))?;
        }
    }

    if let Some(select) = get_element_by_id("category_id") {
        let vm = vm.clone();
        on_change(&select, move |_e: Event| change_category(&vm))?;
    }

    bind_file_labels(&vm)?;

    {
        let vm = vm.clone();
        on_submit(&form, move || {
            let wants_preview = input_by_id("preview_bot").map(|cb| cb.checked()).unwrap_or(false);
            if wants_preview {
                if let Err(e) = prepare_preview(&vm) {
                    log::error!("❌ [BOT-FORM] Vista previa: {:?}", e);
                }
                show_modal(PREVIEW_MODAL_ID);
            } else {
                submit(&vm);
            }
        })?;
    }

    if let Some(button) = get_element_by_id("submit-after-preview") {
        let vm = vm.clone();
        on_click(&button, move |_e: MouseEvent| {
            hide_modal(PREVIEW_MODAL_ID);
            submit(&vm);
        })?;
    }

    // Estado inicial: descuento de la categoría ya elegida (edición) y precio
    if !get_value_by_id("category_id").is_empty() {
        change_category(&vm);
    }
    update_final_price(&vm);
    log::info!("🤖 [BOT-FORM] Formulario montado ({})", form.id());
    Ok(true)
}
