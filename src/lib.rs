/// Bamboo Helper - BambooHR calendar and time off shortcuts
/// Built with Rust + WASM + Yew

mod background;
mod browser;
pub mod config;
pub mod content;
pub mod dates;
pub mod messaging;
pub mod observer;
pub mod payload;
pub mod storage;
pub mod subdomain;
pub mod ui;

use config::ExtensionConfig;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export subdomain extraction for JavaScript access
#[wasm_bindgen]
pub fn extract_subdomain(url: &str) -> Option<String> {
    subdomain::extract_company_subdomain(url)
}

fn read_config(config: JsValue) -> ExtensionConfig {
    if config.is_undefined() || config.is_null() {
        return ExtensionConfig::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_else(|e| {
        log::error!("Invalid extension config, using defaults: {:?}", e);
        ExtensionConfig::default()
    })
}

// Rewrite the calendar data before the page reads it; runs at document_start
#[wasm_bindgen]
pub fn start_early_inject(config: JsValue) {
    let config = read_config(config);
    if let Err(e) = content::interceptor::CalendarDataInterceptor::new(&config).install() {
        log::error!("Failed to set up calendar data interceptor: {}", e);
    }
}

// Start the page features; `config` may override any default
#[wasm_bindgen]
pub fn start_content_script(config: JsValue) {
    if let Err(e) = content::start(read_config(config)) {
        log::error!("Failed to start content script: {}", e);
    }
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

#[wasm_bindgen]
pub fn start_background() {
    background::start();
}
