/// WebExtension API bindings and the typed helpers built on them

use crate::messaging::{InstalledDetails, Message, MessageResponse};
use crate::storage::{LAST_SUBDOMAIN_KEY, StoredState};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn storage_get(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    async fn storage_set(items: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    async fn tabs_query(query_info: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    async fn tabs_create(properties: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(listener: &js_sys::Function);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    fn add_installed_listener(listener: &js_sys::Function);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TabQuery {
    active: bool,
    current_window: bool,
}

#[derive(Deserialize)]
struct TabInfo {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Serialize)]
struct CreateProperties<'a> {
    url: &'a str,
}

/// URL of the active tab in the current window
pub async fn active_tab_url() -> Result<Option<String>, String> {
    let query = serde_wasm_bindgen::to_value(&TabQuery {
        active: true,
        current_window: true,
    })
    .map_err(|e| format!("Failed to serialize tab query: {:?}", e))?;

    let tabs_js = tabs_query(query)
        .await
        .map_err(|e| format!("Failed to query tabs: {:?}", e))?;

    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js)
        .map_err(|e| format!("Failed to parse tabs: {:?}", e))?;

    Ok(tabs.into_iter().next().and_then(|tab| tab.url))
}

pub async fn open_tab(url: &str) -> Result<(), String> {
    let properties = serde_wasm_bindgen::to_value(&CreateProperties { url })
        .map_err(|e| format!("Failed to serialize tab properties: {:?}", e))?;

    tabs_create(properties)
        .await
        .map_err(|e| format!("Failed to open {}: {:?}", url, e))?;

    Ok(())
}

pub async fn load_state() -> Result<StoredState, String> {
    let storage_js = storage_get(LAST_SUBDOMAIN_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    if storage_js.is_null() || storage_js.is_undefined() {
        Ok(StoredState::default())
    } else {
        serde_wasm_bindgen::from_value(storage_js)
            .map_err(|e| format!("Failed to parse storage: {:?}", e))
    }
}

pub async fn save_state(state: &StoredState) -> Result<(), String> {
    let storage_js = serde_wasm_bindgen::to_value(state)
        .map_err(|e| format!("Failed to serialize storage: {:?}", e))?;

    storage_set(storage_js)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))?;

    Ok(())
}

/// Register a runtime message handler for the lifetime of the page
///
/// The handler's reply, if any, is passed to `sendResponse`.
pub fn on_message<F>(handler: F)
where
    F: Fn(Message) -> Option<MessageResponse> + 'static,
{
    let listener = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| -> bool {
            let message: Message = serde_wasm_bindgen::from_value(message).unwrap_or_default();
            log::debug!("Message received: {:?}", message);

            if let Some(reply) = handler(message) {
                match serde_wasm_bindgen::to_value(&reply) {
                    Ok(reply_js) => {
                        if let Err(e) = send_response.call1(&JsValue::NULL, &reply_js) {
                            log::error!("Failed to send response: {:?}", e);
                        }
                    }
                    Err(e) => log::error!("Failed to serialize response: {:?}", e),
                }
            }

            // Keep the channel open for asynchronous responders
            true
        },
    ) as Box<dyn Fn(JsValue, JsValue, js_sys::Function) -> bool>);

    add_message_listener(listener.as_ref().unchecked_ref());
    listener.forget();
}

pub fn on_installed<F>(handler: F)
where
    F: Fn(InstalledDetails) + 'static,
{
    let listener = Closure::wrap(Box::new(move |details: JsValue| {
        match serde_wasm_bindgen::from_value::<InstalledDetails>(details) {
            Ok(details) => handler(details),
            Err(e) => log::error!("Failed to parse install details: {:?}", e),
        }
    }) as Box<dyn Fn(JsValue)>);

    add_installed_listener(listener.as_ref().unchecked_ref());
    listener.forget();
}
