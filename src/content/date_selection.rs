/// Two-click date range selection on the calendar grid
///
/// The first click on a day cell anchors the range; the second completes it,
/// highlights every day in between and opens the request form with the range
/// in the query string. A later click starts over with a new anchor.

use super::{PageContext, document, window};
use crate::config::{ExtensionConfig, Selectors};
use crate::dates::{date_range, parse_day_label, parse_month_day, to_iso};
use crate::observer::{DomWatcher, Watch};
use crate::subdomain::CompanySite;
use chrono::{Datelike, NaiveDate};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent};

pub const SELECTED_CLASS: &str = "bamboo-extension-selected-date";
const ENABLED_ATTRIBUTE: &str = "data-date-selection-enabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Anchored(NaiveDate),
    /// Inclusive range in chronological order
    Completed(Vec<NaiveDate>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    anchor: Option<NaiveDate>,
    selected_dates: Vec<NaiveDate>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, date: NaiveDate) -> SelectionEvent {
        match self.anchor.take() {
            None => {
                self.anchor = Some(date);
                self.selected_dates = vec![date];
                SelectionEvent::Anchored(date)
            }
            Some(anchor) => {
                self.selected_dates = date_range(anchor, date);
                SelectionEvent::Completed(self.selected_dates.clone())
            }
        }
    }

    #[cfg(test)]
    fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    #[cfg(test)]
    fn selected_dates(&self) -> &[NaiveDate] {
        &self.selected_dates
    }
}

/// Request form URL for a completed range
pub fn range_url(site: &CompanySite, range: &[NaiveDate]) -> Result<String, String> {
    let (Some(start), Some(end)) = (range.first(), range.last()) else {
        return Err("Cannot request time off for an empty range".to_string());
    };
    site.request_url_with_range(&to_iso(*start), &to_iso(*end))
}

pub struct DateSelector {
    site: CompanySite,
    selectors: Selectors,
    watcher: DomWatcher,
    state: Rc<RefCell<SelectionState>>,
}

impl DateSelector {
    pub fn new(page: &PageContext, config: &ExtensionConfig) -> Self {
        DateSelector {
            site: CompanySite::new(page.subdomain.clone()),
            selectors: config.selectors.clone(),
            watcher: DomWatcher::new("date selection", config.retry.date_selection),
            state: Rc::new(RefCell::new(SelectionState::new())),
        }
    }

    pub fn install(self) -> Result<(), String> {
        log::info!("Enabling date selection on calendar");
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        let DateSelector {
            site,
            selectors,
            watcher,
            state,
        } = self;
        let handler = Rc::new(ClickHandler {
            site,
            selectors,
            state,
        });

        watcher.watch(&body, move |_attempt| {
            let grid = document
                .query_selector(&handler.selectors.calendar_grid)
                .ok()
                .flatten();
            let Some(grid) = grid.filter(|g| !g.has_attribute(ENABLED_ATTRIBUTE)) else {
                return Watch::Pending;
            };

            if let Err(e) = attach(&grid, handler.clone()) {
                log::error!("{}", e);
            }
            Watch::Found
        })
    }
}

fn attach(grid: &Element, handler: Rc<ClickHandler>) -> Result<(), String> {
    grid.set_attribute(ENABLED_ATTRIBUTE, "true")
        .map_err(|e| format!("Failed to mark calendar: {:?}", e))?;

    let listener = Closure::wrap(Box::new(move |event: MouseEvent| {
        if let Err(e) = handler.on_click(&event) {
            log::error!("Date selection failed: {}", e);
        }
    }) as Box<dyn FnMut(MouseEvent)>);

    grid.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to listen for calendar clicks: {:?}", e))?;
    listener.forget();

    Ok(())
}

struct ClickHandler {
    site: CompanySite,
    selectors: Selectors,
    state: Rc<RefCell<SelectionState>>,
}

impl ClickHandler {
    fn on_click(&self, event: &MouseEvent) -> Result<(), String> {
        let Some(cell) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|t| t.closest(&self.selectors.day_cell).ok().flatten())
        else {
            return Ok(());
        };
        let Some(label) = cell.get_attribute("aria-label") else {
            return Ok(());
        };

        let document = document()?;
        let heading = document
            .query_selector(&self.selectors.heading)
            .ok()
            .flatten()
            .and_then(|h| h.text_content())
            .unwrap_or_default();
        let current_year = js_sys::Date::new_0().get_full_year() as i32;

        let Some(date) = parse_day_label(&label, &heading, current_year) else {
            log::debug!("Ignoring click on unparseable day label '{}'", label);
            return Ok(());
        };

        let event = self.state.borrow_mut().click(date);
        match event {
            SelectionEvent::Anchored(date) => {
                log::debug!("Range anchored at {}", date);
                clear_highlights(&document)?;
                highlight(&cell)?;
            }
            SelectionEvent::Completed(range) => {
                clear_highlights(&document)?;
                for day in &range {
                    if let Some(cell) = find_day_cell(&document, &self.selectors.day_cell, *day)? {
                        highlight(&cell)?;
                    }
                }

                let url = range_url(&self.site, &range)?;
                log::info!("Requesting time off for {} days: {}", range.len(), url);
                window()?
                    .location()
                    .set_href(&url)
                    .map_err(|e| format!("Failed to navigate to {}: {:?}", url, e))?;
            }
        }

        Ok(())
    }
}

fn highlight(cell: &Element) -> Result<(), String> {
    cell.class_list()
        .add_1(SELECTED_CLASS)
        .map_err(|e| format!("Failed to highlight day: {:?}", e))
}

fn clear_highlights(document: &Document) -> Result<(), String> {
    let selected = document
        .query_selector_all(&format!(".{}", SELECTED_CLASS))
        .map_err(|e| format!("Failed to find highlighted days: {:?}", e))?;

    for index in 0..selected.length() {
        if let Some(cell) = selected.item(index).and_then(|n| n.dyn_into::<Element>().ok()) {
            cell.class_list()
                .remove_1(SELECTED_CLASS)
                .map_err(|e| format!("Failed to clear highlight: {:?}", e))?;
        }
    }

    Ok(())
}

/// Day cell whose label names the same month and day
fn find_day_cell(document: &Document, selector: &str, date: NaiveDate) -> Result<Option<Element>, String> {
    let cells = document
        .query_selector_all(selector)
        .map_err(|e| format!("Failed to list day cells: {:?}", e))?;
    let wanted = (date.month(), date.day());

    Ok((0..cells.length())
        .filter_map(|index| cells.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .find(|cell| {
            cell.get_attribute("aria-label")
                .and_then(|label| parse_month_day(&label))
                == Some(wanted)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_click_anchors() {
        let mut state = SelectionState::new();

        assert_eq!(state.click(ymd(2026, 1, 13)), SelectionEvent::Anchored(ymd(2026, 1, 13)));
        assert_eq!(state.anchor(), Some(ymd(2026, 1, 13)));
        assert_eq!(state.selected_dates(), &[ymd(2026, 1, 13)]);
    }

    #[test]
    fn test_second_click_completes_range() {
        let mut state = SelectionState::new();
        state.click(ymd(2026, 1, 13));

        let event = state.click(ymd(2026, 1, 15));

        assert_eq!(
            event,
            SelectionEvent::Completed(vec![ymd(2026, 1, 13), ymd(2026, 1, 14), ymd(2026, 1, 15)])
        );
        assert_eq!(state.anchor(), None);
        assert_eq!(state.selected_dates().len(), 3);
    }

    #[test]
    fn test_reverse_clicks_are_chronological() {
        let mut state = SelectionState::new();
        state.click(ymd(2026, 1, 15));

        assert_eq!(
            state.click(ymd(2026, 1, 13)),
            SelectionEvent::Completed(vec![ymd(2026, 1, 13), ymd(2026, 1, 14), ymd(2026, 1, 15)])
        );
    }

    #[test]
    fn test_third_click_restarts_selection() {
        let mut state = SelectionState::new();
        state.click(ymd(2026, 1, 13));
        state.click(ymd(2026, 1, 15));

        assert_eq!(state.click(ymd(2026, 2, 2)), SelectionEvent::Anchored(ymd(2026, 2, 2)));
        assert_eq!(state.selected_dates(), &[ymd(2026, 2, 2)]);
    }

    #[test]
    fn test_same_day_twice() {
        let mut state = SelectionState::new();
        state.click(ymd(2026, 5, 1));

        assert_eq!(state.click(ymd(2026, 5, 1)), SelectionEvent::Completed(vec![ymd(2026, 5, 1)]));
    }

    #[test]
    fn test_range_url() {
        let site = CompanySite::new("acme");
        let range = date_range(ymd(2026, 1, 13), ymd(2026, 1, 15));

        let url = range_url(&site, &range).unwrap();

        assert!(url.contains("start=2026-01-13&end=2026-01-15"));
        assert!(url.starts_with("https://acme.bamboohr.com/app/time_off/requests/create?"));
    }

    #[test]
    fn test_range_url_empty() {
        assert!(range_url(&CompanySite::new("acme"), &[]).is_err());
    }
}
