//! localStorage backed implementation of the core `Storage` trait

use truthordare_core::{GameError, Storage};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Browser localStorage. Private browsing may deny access; reads then come
/// back empty and writes fail with `GameError::Storage`.
#[derive(Default)]
pub struct LocalStore;

impl Storage for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> truthordare_core::Result<()> {
        let storage = local_storage().ok_or_else(|| GameError::Storage("localStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| GameError::Storage(format!("{}: {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
