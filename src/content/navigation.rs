/// Sidebar "Calendar" link

use super::{PageContext, document};
use crate::config::ExtensionConfig;
use crate::observer::{DomWatcher, Watch};
use crate::subdomain::{CALENDAR_PATH, CompanySite, REQUEST_CREATE_PATH};
use web_sys::Element;

pub const CALENDAR_LINK_ID: &str = "bamboo-calendar-link";

const CALENDAR_ICON: &str = r#"<svg aria-hidden="true" fill="currentColor" height="24" width="24" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M19 4h-1V2h-2v2H8V2H6v2H5c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h14c1.1 0 2-.9 2-2V6c0-1.1-.9-2-2-2zm0 16H5V10h14v10zm0-12H5V6h14v2z"></path></svg>"#;

/// How the link renders on the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStyle {
    pub active: bool,
    /// The request form lays the sidebar out differently; only the icon fits
    pub text_hidden: bool,
}

impl LinkStyle {
    pub fn for_url(href: &str) -> LinkStyle {
        LinkStyle {
            active: href.contains(CALENDAR_PATH),
            text_hidden: href.contains(REQUEST_CREATE_PATH),
        }
    }
}

/// Inner markup of the `<li>` item
pub fn link_markup(calendar_url: &str, style: LinkStyle) -> String {
    let class = if style.active {
        "bamboo-extension-calendar-link bamboo-extension-calendar-link--active"
    } else {
        "bamboo-extension-calendar-link"
    };
    let hidden = if style.text_hidden { " hidden" } else { "" };

    format!(
        concat!(
            r#"<a class="{class}" href="{href}" aria-label="Calendar">"#,
            r#"<div class="bamboo-extension-calendar-container">"#,
            r#"<span class="bamboo-extension-calendar-icon">{icon}</span>"#,
            r#"<div class="bamboo-extension-calendar-text"{hidden}>Calendar</div>"#,
            r#"</div></a>"#
        ),
        class = class,
        href = calendar_url,
        icon = CALENDAR_ICON,
        hidden = hidden,
    )
}

pub struct SidebarLink {
    site: CompanySite,
    style: LinkStyle,
    selector: String,
    watcher: DomWatcher,
}

impl SidebarLink {
    pub fn new(page: &PageContext, config: &ExtensionConfig) -> Self {
        SidebarLink {
            site: CompanySite::new(page.subdomain.clone()),
            style: LinkStyle::for_url(&page.href),
            selector: config.selectors.nav_links.clone(),
            watcher: DomWatcher::new("sidebar link", config.retry.navigation),
        }
    }

    pub fn install(self) -> Result<(), String> {
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        let SidebarLink {
            site,
            style,
            selector,
            watcher,
        } = self;

        watcher.watch(&body, move |attempt| {
            let nav_links = document.query_selector(&selector).ok().flatten();

            if matches!(attempt, 1 | 10 | 50) {
                log::debug!("Attempt {}: looking for sidebar, found: {}", attempt, nav_links.is_some());
            }

            let Some(nav_links) = nav_links else {
                return Watch::Pending;
            };
            if document.get_element_by_id(CALENDAR_LINK_ID).is_some() {
                return Watch::Found;
            }

            match append_link(&document, &nav_links, &site, style) {
                Ok(()) => log::info!("Calendar link added to sidebar"),
                Err(e) => log::error!("{}", e),
            }
            Watch::Found
        })
    }
}

fn append_link(
    document: &web_sys::Document,
    nav_links: &Element,
    site: &CompanySite,
    style: LinkStyle,
) -> Result<(), String> {
    let item = document
        .create_element("li")
        .map_err(|e| format!("Failed to create calendar link: {:?}", e))?;
    item.set_id(CALENDAR_LINK_ID);
    item.set_inner_html(&link_markup(&site.calendar_url(), style));

    nav_links
        .append_child(&item)
        .map_err(|e| format!("Failed to append calendar link: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_style() {
        assert_eq!(
            LinkStyle::for_url("https://acme.bamboohr.com/calendar"),
            LinkStyle { active: true, text_hidden: false }
        );
        assert_eq!(
            LinkStyle::for_url("https://acme.bamboohr.com/app/time_off/requests/create"),
            LinkStyle { active: false, text_hidden: true }
        );
        assert_eq!(
            LinkStyle::for_url("https://acme.bamboohr.com/home"),
            LinkStyle { active: false, text_hidden: false }
        );
    }

    #[test]
    fn test_link_markup_active() {
        let markup = link_markup(
            "https://acme.bamboohr.com/calendar",
            LinkStyle { active: true, text_hidden: false },
        );

        assert!(markup.contains(r#"href="https://acme.bamboohr.com/calendar""#));
        assert!(markup.contains("bamboo-extension-calendar-link--active"));
        assert!(markup.contains(r#"<div class="bamboo-extension-calendar-text">Calendar</div>"#));
    }

    #[test]
    fn test_link_markup_hidden_text() {
        let markup = link_markup(
            "https://acme.bamboohr.com/calendar",
            LinkStyle { active: false, text_hidden: true },
        );

        assert!(!markup.contains("--active"));
        assert!(markup.contains(r#"<div class="bamboo-extension-calendar-text" hidden>Calendar</div>"#));
    }
}
