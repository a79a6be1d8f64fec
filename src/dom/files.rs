// ============================================================================
// FILES - Archivos de <input type=file> y lectura local con FileReader
// ============================================================================

use futures::channel::oneshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, FileReader, HtmlInputElement};

/// Archivos seleccionados en el input, en orden de selección
pub fn selected_files(input: &HtmlInputElement) -> Vec<File> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Lee el archivo como `data:` URL. Cada lectura se resuelve por su cuenta
pub async fn read_as_data_url(file: &File) -> Result<String, JsValue> {
    let reader = FileReader::new()?;
    let (tx, rx) = oneshot::channel::<Result<String, JsValue>>();
    let tx = std::rc::Rc::new(std::cell::RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        let reader = reader.clone();
        Closure::wrap(Box::new(move |_e: Event| {
            let result = reader
                .result()
                .ok()
                .and_then(|value| value.as_string())
                .ok_or_else(|| JsValue::from_str("empty read"));
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }) as Box<dyn FnMut(Event)>)
    };
    let on_error = Closure::wrap(Box::new(move |_e: Event| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(Err(JsValue::from_str("read failed")));
        }
    }) as Box<dyn FnMut(Event)>);

    reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
    reader.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    reader.read_as_data_url(file)?;

    // Los closures viven hasta que llega la respuesta
    let result = rx.await.unwrap_or_else(|_| Err(JsValue::from_str("reader dropped")));
    reader.set_onload(None);
    reader.set_onerror(None);
    drop(on_load);
    drop(on_error);
    result
}
