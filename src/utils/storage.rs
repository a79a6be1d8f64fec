use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;

use crate::utils::constants::TOKEN_STORAGE_KEY;

/// Almacenamiento persistente del token de acceso
pub trait TokenStore {
    fn load_token(&self) -> Option<String>;
    fn save_token(&self, token: &str) -> Result<(), String>;
    fn clear_token(&self) -> Result<(), String>;
}

/// Token en localStorage, guardado en crudo (sin JSON) para que las
/// plantillas del servidor lo lean igual
pub struct LocalTokenStore {
    key: &'static str,
}

impl LocalTokenStore {
    pub fn new() -> Self {
        Self { key: TOKEN_STORAGE_KEY }
    }
}

impl Default for LocalTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for LocalTokenStore {
    fn load_token(&self) -> Option<String> {
        LocalStorage::raw()
            .get_item(self.key)
            .ok()
            .flatten()
            .filter(|token| !token.trim().is_empty())
    }

    fn save_token(&self, token: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(self.key, token)
            .map_err(|_| "Error guardando token en localStorage".to_string())
    }

    fn clear_token(&self) -> Result<(), String> {
        LocalStorage::raw()
            .remove_item(self.key)
            .map_err(|_| "Error eliminando token de localStorage".to_string())
    }
}

/// Token en memoria (tests y entornos sin localStorage)
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save_token(&self, token: &str) -> Result<(), String> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), String> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}
