/// Content script: decides which page features to start and starts them

pub mod calendar_button;
pub mod date_selection;
pub mod interceptor;
pub mod navigation;
pub mod time_off;

use crate::config::ExtensionConfig;
use crate::messaging::MessageResponse;
use crate::subdomain::{BAMBOO_HOST_SUFFIX, CALENDAR_PATH, REQUEST_CREATE_PATH, subdomain_from_hostname};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

/// Features that apply to one page load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFeatures {
    pub sidebar_link: bool,
    pub calendar_button: bool,
    pub date_selection: bool,
    pub form_population: bool,
}

impl PageFeatures {
    pub fn for_url(href: &str) -> PageFeatures {
        let on_bamboo = href.contains(BAMBOO_HOST_SUFFIX);
        let on_calendar = href.contains(&format!("{}{}", BAMBOO_HOST_SUFFIX, CALENDAR_PATH));

        PageFeatures {
            sidebar_link: on_bamboo,
            calendar_button: on_calendar,
            date_selection: on_calendar,
            form_population: href.contains(REQUEST_CREATE_PATH),
        }
    }
}

/// Snapshot of the page the content script runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub href: String,
    pub subdomain: String,
}

impl PageContext {
    pub fn current() -> Result<PageContext, String> {
        let location = window()?.location();
        let href = location
            .href()
            .map_err(|e| format!("Failed to read location: {:?}", e))?;
        let hostname = location
            .hostname()
            .map_err(|e| format!("Failed to read hostname: {:?}", e))?;
        let subdomain = subdomain_from_hostname(&hostname)
            .ok_or_else(|| format!("No company subdomain in {}", hostname))?;

        Ok(PageContext { href, subdomain })
    }
}

pub(crate) fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "window is unavailable".to_string())
}

pub(crate) fn document() -> Result<Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

/// Entry point once the configuration is known
pub fn start(config: ExtensionConfig) -> Result<(), String> {
    log::info!("Bamboo helper content script loaded");

    crate::browser::on_message(|message| {
        log::debug!("Content script received {:?}", message);
        Some(MessageResponse::received())
    });

    let document = document()?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once(move || {
            if let Err(e) = init_features(&config) {
                log::error!("Failed to initialize page features: {}", e);
            }
        });
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to wait for DOMContentLoaded: {:?}", e))?;
        on_ready.forget();
        Ok(())
    } else {
        init_features(&config)
    }
}

fn init_features(config: &ExtensionConfig) -> Result<(), String> {
    let page = PageContext::current()?;
    let features = PageFeatures::for_url(&page.href);
    log::info!("Initializing Bamboo helper on {}: {:?}", page.href, features);

    // One failing feature must not keep the others from starting
    let mut results = Vec::new();

    if features.sidebar_link {
        results.push(navigation::SidebarLink::new(&page, config).install());
    }
    if features.calendar_button {
        results.push(calendar_button::TimeOffButton::new(&page, config).install());
    }
    if features.date_selection {
        results.push(date_selection::DateSelector::new(&page, config).install());
    }
    if features.form_population {
        results.push(time_off::FormPopulator::new(&page, config).install());
    }

    for result in results {
        if let Err(e) = result {
            log::error!("{}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_page_features() {
        let features = PageFeatures::for_url("https://acme.bamboohr.com/calendar");

        assert_eq!(
            features,
            PageFeatures {
                sidebar_link: true,
                calendar_button: true,
                date_selection: true,
                form_population: false,
            }
        );
    }

    #[test]
    fn test_request_page_features() {
        let features = PageFeatures::for_url(
            "https://acme.bamboohr.com/app/time_off/requests/create?start=2026-01-13&end=2026-01-15",
        );

        assert!(features.sidebar_link);
        assert!(!features.calendar_button);
        assert!(!features.date_selection);
        assert!(features.form_population);
    }

    #[test]
    fn test_other_bamboo_page_features() {
        let features = PageFeatures::for_url("https://acme.bamboohr.com/home");

        assert!(features.sidebar_link);
        assert!(!features.calendar_button);
        assert!(!features.form_population);
    }

    #[test]
    fn test_non_bamboo_page_features() {
        assert_eq!(PageFeatures::for_url("https://example.com/calendar"), PageFeatures::default());
    }
}
