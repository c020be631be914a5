use wasm_bindgen::JsValue;
use web_sys::Storage;

use neonchat_core::{ChatError, KeyValueStore};

/// `window.localStorage` as a transcript backend
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, JsValue> {
        let storage = crate::window()?
            .local_storage()?
            .ok_or_else(|| JsValue::from_str("localStorage is not available"))?;
        Ok(Self { storage })
    }
}

fn storage_error(op: &str, e: JsValue) -> ChatError {
    ChatError::Storage(format!("localStorage {} failed: {:?}", op, e))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> neonchat_core::Result<Option<String>> {
        self.storage.get_item(key).map_err(|e| storage_error("read", e))
    }

    fn set(&self, key: &str, value: &str) -> neonchat_core::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_error("write", e))
    }

    fn remove(&self, key: &str) -> neonchat_core::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_error("remove", e))
    }
}
