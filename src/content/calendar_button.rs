/// "Request Time Off" button in the calendar filter toolbar

use super::{PageContext, document};
use crate::config::ExtensionConfig;
use crate::observer::{DomWatcher, Watch};
use crate::subdomain::CompanySite;
use web_sys::{Document, Element};

pub const TIME_OFF_BUTTON_ID: &str = "bamboo-timeoff-button";

const PLUS_ICON: &str = r#"<svg aria-hidden="true" fill="currentColor" height="20" width="20" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M19 13h-6v6h-2v-6H5v-2h6V5h2v6h6v2z"/></svg>"#;

pub fn button_markup() -> String {
    format!("{} Request Time Off", PLUS_ICON)
}

pub struct TimeOffButton {
    site: CompanySite,
    selector: String,
    watcher: DomWatcher,
}

impl TimeOffButton {
    pub fn new(page: &PageContext, config: &ExtensionConfig) -> Self {
        TimeOffButton {
            site: CompanySite::new(page.subdomain.clone()),
            selector: config.selectors.filter_controls.clone(),
            watcher: DomWatcher::new("time off button", config.retry.calendar_button),
        }
    }

    pub fn install(self) -> Result<(), String> {
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        let TimeOffButton {
            site,
            selector,
            watcher,
        } = self;
        let href = site.request_url();

        watcher.watch(&body, move |_attempt| {
            let Some(filter_section) = document.query_selector(&selector).ok().flatten() else {
                return Watch::Pending;
            };
            if document.get_element_by_id(TIME_OFF_BUTTON_ID).is_none() {
                match append_button(&document, &filter_section, &href) {
                    Ok(()) => log::info!("Time off button added"),
                    Err(e) => log::error!("{}", e),
                }
            }
            Watch::Found
        })
    }
}

fn append_button(document: &Document, filter_section: &Element, href: &str) -> Result<(), String> {
    let button = document
        .create_element("a")
        .map_err(|e| format!("Failed to create time off button: {:?}", e))?;
    button.set_id(TIME_OFF_BUTTON_ID);
    button.set_class_name("bamboo-extension-timeoff-button");
    button
        .set_attribute("href", href)
        .map_err(|e| format!("Failed to set time off button href: {:?}", e))?;
    button.set_inner_html(&button_markup());

    filter_section
        .append_child(&button)
        .map_err(|e| format!("Failed to append time off button: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_markup() {
        let markup = button_markup();

        assert!(markup.starts_with("<svg"));
        assert!(markup.ends_with("Request Time Off"));
    }
}
