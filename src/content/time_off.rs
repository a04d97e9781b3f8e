/// Time off request form population from `start`/`end` URL parameters

use super::{PageContext, document};
use crate::config::{ExtensionConfig, FieldStrategy};
use crate::dates::DateFormats;
use crate::observer::{DomWatcher, Watch, schedule};
use crate::subdomain::range_params;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventInit, HtmlInputElement};

/// Attributes of one `<input>` the classifier looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub aria_label: String,
}

impl FieldDescriptor {
    pub fn matches(&self, strategy: FieldStrategy, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&keyword);

        match strategy {
            FieldStrategy::Any => {
                contains(&self.name)
                    || contains(&self.id)
                    || contains(&self.placeholder)
                    || contains(&self.aria_label)
            }
            FieldStrategy::Name => contains(&self.name),
            FieldStrategy::Id => contains(&self.id),
            FieldStrategy::Placeholder => contains(&self.placeholder),
            FieldStrategy::AriaLabel => contains(&self.aria_label),
        }
    }

    fn looks_like_date(&self) -> bool {
        [&self.name, &self.id, &self.placeholder, &self.aria_label]
            .iter()
            .any(|value| value.to_lowercase().contains("date"))
    }
}

/// Indices of the start and end fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFields {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl DateFields {
    pub fn both(&self) -> Option<(usize, usize)> {
        self.start.zip(self.end)
    }
}

/// First field matched by the earliest strategy, skipping `exclude`
fn find_field(
    fields: &[FieldDescriptor],
    strategies: &[FieldStrategy],
    keyword: &str,
    exclude: Option<usize>,
) -> Option<usize> {
    strategies.iter().find_map(|strategy| {
        fields
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .find(|(_, field)| field.matches(*strategy, keyword))
            .map(|(index, _)| index)
    })
}

/// Pick the start and end date inputs
///
/// Strategies are tried in order and the first match wins; a field chosen as
/// the start is never also used as the end.
pub fn classify_fields(fields: &[FieldDescriptor], strategies: &[FieldStrategy]) -> DateFields {
    let start = find_field(fields, strategies, "start", None);
    let end = find_field(fields, strategies, "end", start);
    DateFields { start, end }
}

/// Whether the form still shows no usable date after a write
pub fn needs_retry(value: &str, placeholders: &[String]) -> bool {
    let value = value.trim();
    value.is_empty() || placeholders.iter().any(|p| p.eq_ignore_ascii_case(value))
}

/// Values written after each retry delay, in order
pub fn fallback_values(formats: &DateFormats) -> [&str; 2] {
    [formats.iso.as_str(), formats.slash.as_str()]
}

pub struct FormPopulator {
    href: String,
    strategies: Vec<FieldStrategy>,
    placeholders: Vec<String>,
    retry_delays_ms: Vec<u32>,
    watcher: DomWatcher,
}

impl FormPopulator {
    pub fn new(page: &PageContext, config: &ExtensionConfig) -> Self {
        FormPopulator {
            href: page.href.clone(),
            strategies: config.field_strategies.clone(),
            placeholders: config.placeholder_values.clone(),
            retry_delays_ms: config.retry_delays_ms.clone(),
            watcher: DomWatcher::new("time off form", config.retry.time_off_form),
        }
    }

    pub fn install(self) -> Result<(), String> {
        log::info!("Attempting to populate time off dates from URL");

        let Some((start, end)) = range_params(&self.href) else {
            log::info!("No date parameters found in URL");
            return Ok(());
        };
        let start = DateFormats::from_iso(&start)?;
        let end = DateFormats::from_iso(&end)?;
        log::debug!("Formatted dates: start {:?}, end {:?}", start, end);

        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        let FormPopulator {
            strategies,
            placeholders,
            retry_delays_ms,
            watcher,
            ..
        } = self;

        watcher.watch(&body, move |attempt| {
            let inputs = match collect_inputs(&document) {
                Ok(inputs) => inputs,
                Err(e) => {
                    log::error!("{}", e);
                    return Watch::Pending;
                }
            };
            let descriptors: Vec<FieldDescriptor> = inputs.iter().map(describe).collect();

            if (1..=3).contains(&attempt) {
                log_candidates(attempt, &descriptors);
            }

            let Some((start_index, end_index)) = classify_fields(&descriptors, &strategies).both() else {
                return Watch::Pending;
            };
            log::info!(
                "Found date fields: start {:?}, end {:?}",
                descriptors[start_index],
                descriptors[end_index]
            );

            let filler = FieldFiller {
                placeholders: placeholders.clone(),
                retry_delays_ms: retry_delays_ms.clone(),
            };
            for (input, formats) in [(&inputs[start_index], &start), (&inputs[end_index], &end)] {
                if let Err(e) = filler.fill(input.clone(), formats.clone()) {
                    log::error!("{}", e);
                }
            }
            log::info!("Date fields populated");
            Watch::Found
        })
    }
}

fn collect_inputs(document: &Document) -> Result<Vec<HtmlInputElement>, String> {
    let nodes = document
        .query_selector_all("input")
        .map_err(|e| format!("Failed to list inputs: {:?}", e))?;

    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

fn describe(input: &HtmlInputElement) -> FieldDescriptor {
    FieldDescriptor {
        name: input.name(),
        id: input.id(),
        placeholder: input.placeholder(),
        aria_label: input.get_attribute("aria-label").unwrap_or_default(),
    }
}

fn log_candidates(attempt: u32, descriptors: &[FieldDescriptor]) {
    if attempt == 1 {
        log::debug!("Found total inputs: {}", descriptors.len());
    }
    for (index, descriptor) in descriptors.iter().enumerate() {
        let named_like_range = descriptor.matches(FieldStrategy::Name, "start")
            || descriptor.matches(FieldStrategy::Name, "end");
        if descriptor.looks_like_date() || named_like_range {
            log::debug!("Input {}: {:?}", index, descriptor);
        }
    }
}

struct FieldFiller {
    placeholders: Vec<String>,
    retry_delays_ms: Vec<u32>,
}

impl FieldFiller {
    /// Write the long form now, then fall back to other formats on timers
    fn fill(&self, input: HtmlInputElement, formats: DateFormats) -> Result<(), String> {
        set_value(&input, &formats.long)?;

        let fallbacks = fallback_values(&formats).map(str::to_string);
        for (delay_ms, value) in self.retry_delays_ms.iter().zip(fallbacks) {
            let input = input.clone();
            let placeholders = self.placeholders.clone();
            schedule(*delay_ms, move || {
                if needs_retry(&input.value(), &placeholders) {
                    log::debug!("Retrying date field with {}", value);
                    if let Err(e) = set_value(&input, &value) {
                        log::error!("{}", e);
                    }
                }
            })?;
        }

        // Opens any native date picker
        input.click();
        input
            .focus()
            .map_err(|e| format!("Failed to focus date field: {:?}", e))?;

        Ok(())
    }
}

fn set_value(input: &HtmlInputElement, value: &str) -> Result<(), String> {
    input.set_value(value);
    for kind in ["input", "change"] {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict(kind, &init)
            .map_err(|e| format!("Failed to create {} event: {:?}", kind, e))?;
        input
            .dispatch_event(&event)
            .map_err(|e| format!("Failed to dispatch {} event: {:?}", kind, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, id: &str, placeholder: &str, aria_label: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            id: id.to_string(),
            placeholder: placeholder.to_string(),
            aria_label: aria_label.to_string(),
        }
    }

    fn default_strategies() -> Vec<FieldStrategy> {
        ExtensionConfig::default().field_strategies
    }

    #[test]
    fn test_classify_by_name() {
        let fields = vec![
            field("employee", "", "", ""),
            field("startDate", "", "", ""),
            field("endDate", "", "", ""),
        ];

        let result = classify_fields(&fields, &default_strategies());

        assert_eq!(result, DateFields { start: Some(1), end: Some(2) });
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let fields = vec![
            field("", "", "", "Start date"),
            field("", "", "", "END DATE"),
        ];

        assert_eq!(classify_fields(&fields, &default_strategies()).both(), Some((0, 1)));
    }

    #[test]
    fn test_first_match_wins() {
        let fields = vec![
            field("startDate", "", "", ""),
            field("startTime", "", "", ""),
            field("endDate", "", "", ""),
            field("endTime", "", "", ""),
        ];

        assert_eq!(classify_fields(&fields, &default_strategies()).both(), Some((0, 2)));
    }

    #[test]
    fn test_document_order_across_attributes() {
        // The first field matches by id, the second by name; the earlier field wins
        let fields = vec![
            field("", "leaveStart", "", ""),
            field("startDate", "", "", ""),
            field("", "", "End", ""),
        ];

        assert_eq!(classify_fields(&fields, &default_strategies()).both(), Some((0, 2)));
    }

    #[test]
    fn test_strategy_priority() {
        let fields = vec![
            field("", "", "", "start"),
            field("start", "", "", ""),
            field("end", "", "", ""),
        ];

        let name_first = vec![FieldStrategy::Name, FieldStrategy::AriaLabel];
        assert_eq!(classify_fields(&fields, &name_first).start, Some(1));

        let aria_first = vec![FieldStrategy::AriaLabel, FieldStrategy::Name];
        assert_eq!(classify_fields(&fields, &aria_first).start, Some(0));
    }

    #[test]
    fn test_start_field_not_reused_for_end() {
        // "startOrEnd" contains both keywords
        let fields = vec![field("startOrEnd", "", "", ""), field("", "dateEnd", "", "")];

        assert_eq!(classify_fields(&fields, &default_strategies()).both(), Some((0, 1)));
    }

    #[test]
    fn test_missing_end_field() {
        let fields = vec![field("startDate", "", "", ""), field("notes", "", "", "")];
        let result = classify_fields(&fields, &default_strategies());

        assert_eq!(result.start, Some(0));
        assert_eq!(result.both(), None);
    }

    #[test]
    fn test_disabled_strategies_find_nothing() {
        let fields = vec![field("startDate", "", "", ""), field("endDate", "", "", "")];
        assert_eq!(classify_fields(&fields, &[FieldStrategy::Placeholder]), DateFields::default());
    }

    #[test]
    fn test_needs_retry() {
        let placeholders = vec!["20 mon yyyy".to_string()];

        assert!(needs_retry("", &placeholders));
        assert!(needs_retry("  ", &placeholders));
        assert!(needs_retry("20 Mon YYYY", &placeholders));
        assert!(!needs_retry("13 Jan 2026", &placeholders));
    }

    #[test]
    fn test_fallback_order() {
        let formats = DateFormats::from_iso("2026-01-13").unwrap();
        assert_eq!(fallback_values(&formats), ["2026-01-13", "1/13/2026"]);
    }

    #[test]
    fn test_url_round_trip() {
        let href = "https://acme.bamboohr.com/app/time_off/requests/create?start=2026-01-13&end=2026-01-15";
        let (start, end) = range_params(href).unwrap();

        let start = DateFormats::from_iso(&start).unwrap();
        let end = DateFormats::from_iso(&end).unwrap();

        assert_eq!(start.iso, "2026-01-13");
        assert_eq!(start.long, "13 Jan 2026");
        assert_eq!(start.slash, "1/13/2026");
        assert_eq!(end.long, "15 Jan 2026");
    }
}
