/// Rewrites the calendar page-load data before the host page reads it

use super::document;
use crate::config::ExtensionConfig;
use crate::observer::{DomWatcher, Watch};
use crate::payload::{PayloadEdit, WEEKENDS_FILTER_KEY, deselect_filter};
use web_sys::{Document, Element, Node};

pub struct CalendarDataInterceptor {
    script_id: String,
    filter_key: &'static str,
    watcher: DomWatcher,
}

impl CalendarDataInterceptor {
    pub fn new(config: &ExtensionConfig) -> Self {
        CalendarDataInterceptor {
            script_id: config.selectors.calendar_data_script_id.clone(),
            filter_key: WEEKENDS_FILTER_KEY,
            watcher: DomWatcher::new("calendar data interceptor", config.retry.interceptor),
        }
    }

    pub fn install(self) -> Result<(), String> {
        let document = document()?;
        let root: Node = match document.document_element() {
            Some(element) => element.into(),
            None => document.clone().into(),
        };

        let CalendarDataInterceptor {
            script_id,
            filter_key,
            watcher,
        } = self;

        log::info!("Watching for #{} to intercept calendar data", script_id);

        watcher.watch(&root, move |_attempt| {
            match find_script(&document, &script_id) {
                Some(script) => {
                    rewrite(&script, filter_key);
                    Watch::Found
                }
                None => Watch::Pending,
            }
        })
    }
}

fn find_script(document: &Document, script_id: &str) -> Option<Element> {
    document
        .get_element_by_id(script_id)
        .filter(|element| element.tag_name().eq_ignore_ascii_case("script"))
}

/// Errors are logged and leave the original payload in place
fn rewrite(script: &Element, filter_key: &str) {
    let text = script.text_content().unwrap_or_default();
    let text = if text.trim().is_empty() { "{}".to_string() } else { text };

    match deselect_filter(&text, filter_key) {
        Ok(PayloadEdit::Rewritten(json)) => {
            script.set_text_content(Some(&json));
            log::info!("Set {} filter to unselected before page initialization", filter_key);
        }
        Ok(PayloadEdit::Untouched) => {
            log::debug!("Calendar data has no {} filter", filter_key);
        }
        Err(e) => log::error!("Error modifying calendar data: {}", e),
    }
}
