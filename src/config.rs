/// Runtime configuration for the content features
///
/// Every field has a default matching the current BambooHR markup, so a
/// partial JS object only needs the keys it overrides.
use serde::{Deserialize, Serialize};

/// How long a DOM watcher keeps looking before it gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Mutation notifications to inspect; None keeps watching forever
    pub max_attempts: Option<u32>,
    pub timeout_ms: Option<u32>,
}

impl RetryPolicy {
    pub const fn unbounded() -> Self {
        RetryPolicy {
            max_attempts: None,
            timeout_ms: None,
        }
    }

    pub const fn attempts(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts: Some(max_attempts),
            timeout_ms: None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Input attribute consulted when classifying request form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldStrategy {
    /// Any of the attributes below, in document order
    Any,
    Name,
    Id,
    Placeholder,
    AriaLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selectors {
    pub nav_links: String,
    pub filter_controls: String,
    pub calendar_grid: String,
    pub day_cell: String,
    pub heading: String,
    pub calendar_data_script_id: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            nav_links: ".fabric-1ks1eua-links".to_string(),
            filter_controls: ".CalendarMenu__filterControls".to_string(),
            calendar_grid: "[role=\"table\"]".to_string(),
            day_cell: ".Calendar__day".to_string(),
            heading: "h1".to_string(),
            calendar_data_script_id: "js-calendar-page-load-data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub interceptor: RetryPolicy,
    pub navigation: RetryPolicy,
    pub calendar_button: RetryPolicy,
    pub date_selection: RetryPolicy,
    pub time_off_form: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            interceptor: RetryPolicy::unbounded(),
            navigation: RetryPolicy::attempts(100),
            calendar_button: RetryPolicy::unbounded(),
            date_selection: RetryPolicy::unbounded(),
            time_off_form: RetryPolicy::attempts(50),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionConfig {
    pub selectors: Selectors,
    pub retry: RetryConfig,
    pub field_strategies: Vec<FieldStrategy>,
    pub placeholder_values: Vec<String>,
    pub retry_delays_ms: Vec<u32>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            selectors: Selectors::default(),
            retry: RetryConfig::default(),
            field_strategies: vec![FieldStrategy::Any],
            placeholder_values: vec!["20 mon yyyy".to_string()],
            retry_delays_ms: vec![100, 200],
        }
    }
}
