/// Company subdomain extraction and BambooHR URL construction
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub const BAMBOO_HOST_SUFFIX: &str = ".bamboohr.com";
pub const CALENDAR_PATH: &str = "/calendar";
pub const REQUEST_CREATE_PATH: &str = "/app/time_off/requests/create";

fn company_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://([^./]+)\.bamboohr\.com(?:[/:?#]|$)").expect("valid subdomain regex")
    })
}

/// Extract the company subdomain from a BambooHR page URL
///
/// Examples:
/// - https://acme.bamboohr.com/calendar → acme
/// - https://acme.bamboohr.com → acme
/// - https://www.google.com → None
/// - http://acme.bamboohr.com → None (only https pages are recognised)
pub fn extract_company_subdomain(url: &str) -> Option<String> {
    company_url_pattern()
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|label| is_valid_label(label))
}

/// First label of a hostname, e.g. "acme.bamboohr.com" → "acme"
pub fn subdomain_from_hostname(hostname: &str) -> Option<String> {
    hostname
        .split('.')
        .next()
        .map(str::to_lowercase)
        .filter(|label| is_valid_label(label))
}

/// Check that a string is a syntactically valid hostname label
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// URLs for one company's BambooHR site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySite {
    subdomain: String,
}

impl CompanySite {
    pub fn new(subdomain: impl Into<String>) -> Self {
        CompanySite {
            subdomain: subdomain.into(),
        }
    }

    pub fn host(&self) -> String {
        format!("{}{}", self.subdomain, BAMBOO_HOST_SUFFIX)
    }

    fn origin(&self) -> String {
        format!("https://{}", self.host())
    }

    pub fn calendar_url(&self) -> String {
        format!("{}{}", self.origin(), CALENDAR_PATH)
    }

    pub fn request_url(&self) -> String {
        format!("{}{}", self.origin(), REQUEST_CREATE_PATH)
    }

    /// Request-creation URL carrying `start`/`end` query parameters
    pub fn request_url_with_range(&self, start: &str, end: &str) -> Result<String, String> {
        let mut url = Url::parse(&self.request_url())
            .map_err(|e| format!("Invalid request URL for {}: {}", self.subdomain, e))?;
        url.query_pairs_mut()
            .append_pair("start", start)
            .append_pair("end", end);
        Ok(url.into())
    }
}

/// Read the `start`/`end` query parameters from a page URL
///
/// Returns None unless both are present and non-empty.
pub fn range_params(href: &str) -> Option<(String, String)> {
    let url = Url::parse(href).ok()?;
    let mut start = None;
    let mut end = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "start" if start.is_none() => start = Some(value.into_owned()),
            "end" if end.is_none() => end = Some(value.into_owned()),
            _ => {}
        }
    }

    match (start, end) {
        (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => Some((s, e)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_company_subdomain_basic() {
        assert_eq!(
            extract_company_subdomain("https://acme.bamboohr.com/calendar"),
            Some("acme".to_string())
        );
        assert_eq!(
            extract_company_subdomain("https://acme.bamboohr.com"),
            Some("acme".to_string())
        );
        assert_eq!(
            extract_company_subdomain("https://big-co.bamboohr.com/app/time_off/requests/create?start=2026-01-13"),
            Some("big-co".to_string())
        );
    }

    #[test]
    fn test_extract_company_subdomain_non_bamboo() {
        assert_eq!(extract_company_subdomain("https://www.google.com"), None);
        assert_eq!(extract_company_subdomain("https://bamboohr.com/calendar"), None);
        assert_eq!(extract_company_subdomain("https://acme.bamboohr.com.evil.io/"), None);
        assert_eq!(extract_company_subdomain("http://acme.bamboohr.com"), None);
        assert_eq!(extract_company_subdomain("chrome://extensions"), None);
        assert_eq!(extract_company_subdomain(""), None);
    }

    #[test]
    fn test_subdomain_from_hostname() {
        assert_eq!(subdomain_from_hostname("acme.bamboohr.com"), Some("acme".to_string()));
        assert_eq!(subdomain_from_hostname("ACME.bamboohr.com"), Some("acme".to_string()));
        assert_eq!(subdomain_from_hostname(""), None);
    }

    #[test]
    fn test_is_valid_label() {
        assert!(is_valid_label("acme"));
        assert!(is_valid_label("acme-2"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("-acme"));
        assert!(!is_valid_label("acme-"));
        assert!(!is_valid_label("ac me"));
        assert!(!is_valid_label(&"a".repeat(64)));
    }

    #[test]
    fn test_company_site_urls() {
        let site = CompanySite::new("acme");

        assert_eq!(site.host(), "acme.bamboohr.com");
        assert_eq!(site.calendar_url(), "https://acme.bamboohr.com/calendar");
        assert_eq!(
            site.request_url(),
            "https://acme.bamboohr.com/app/time_off/requests/create"
        );
    }

    #[test]
    fn test_request_url_with_range() {
        let site = CompanySite::new("acme");
        let url = site.request_url_with_range("2026-01-13", "2026-01-15").unwrap();

        assert_eq!(
            url,
            "https://acme.bamboohr.com/app/time_off/requests/create?start=2026-01-13&end=2026-01-15"
        );
    }

    #[test]
    fn test_range_params() {
        let href = "https://acme.bamboohr.com/app/time_off/requests/create?start=2026-01-13&end=2026-01-15";
        assert_eq!(
            range_params(href),
            Some(("2026-01-13".to_string(), "2026-01-15".to_string()))
        );
    }

    #[test]
    fn test_range_params_missing() {
        assert_eq!(range_params("https://acme.bamboohr.com/app/time_off/requests/create"), None);
        assert_eq!(
            range_params("https://acme.bamboohr.com/app/time_off/requests/create?start=2026-01-13"),
            None
        );
        assert_eq!(
            range_params("https://acme.bamboohr.com/app/time_off/requests/create?start=&end=2026-01-13"),
            None
        );
        assert_eq!(range_params("not a url"), None);
    }
}
