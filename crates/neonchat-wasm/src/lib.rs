use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use neonchat_core::WidgetConfig;

mod chat_ui;
mod dom;
mod sound;
mod storage;
mod websocket;

pub use storage::LocalStorage;

/// Module entry point: route panics and `log` output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    log::debug!("neonchat module loaded");
}

/// Mount the chat widget on the current page and start the session.
///
/// `config_json` optionally overrides [`WidgetConfig`] fields, e.g.
/// `{"endpoint": "wss://example.com/chat", "assistant_name": "Neon"}`.
#[wasm_bindgen]
pub fn init_chat_widget(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => WidgetConfig::from_json_str(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid widget config: {}", e)))?,
        None => WidgetConfig::default(),
    };

    log::info!("Mounting chat widget against {}", config.endpoint);
    let widget = chat_ui::ChatWidget::mount(config)?;
    widget.start();
    Ok(())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
