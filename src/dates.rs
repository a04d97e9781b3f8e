/// Calendar date parsing, ranges and the string formats the request form accepts
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

const MONTHS: [(&str, &str); 12] = [
    ("January", "Jan"),
    ("February", "Feb"),
    ("March", "Mar"),
    ("April", "Apr"),
    ("May", "May"),
    ("June", "Jun"),
    ("July", "Jul"),
    ("August", "Aug"),
    ("September", "Sep"),
    ("October", "Oct"),
    ("November", "Nov"),
    ("December", "Dec"),
];

fn day_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)\s+(\d+)").expect("valid day label regex"))
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}").expect("valid year regex"))
}

/// Month number (1-12) for a full or three-letter English month name
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|(full, short)| *full == name || *short == name)
        .map(|index| index as u32 + 1)
}

/// Three-letter month abbreviation for a month number (1-12)
pub fn short_month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).map(|(_, short)| *short)
}

/// Month and day from a day cell label such as "January 13th" or "Jan 1"
pub fn parse_month_day(label: &str) -> Option<(u32, u32)> {
    let caps = day_label_pattern().captures(label.trim())?;
    let month = month_from_name(caps.get(1)?.as_str())?;
    let day = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((month, day))
}

/// First four-digit number in the page heading
pub fn heading_year(heading: &str) -> Option<i32> {
    year_pattern().find(heading)?.as_str().parse().ok()
}

/// Resolve a day cell label to a date using the page heading for the year
///
/// The grid shows trailing days of neighbouring months, so a December cell
/// under a "January" heading belongs to the previous year and a January cell
/// under a "December" heading to the next one.
///
/// Examples:
/// - ("January 13th", "January 2026") → 2026-01-13
/// - ("December 30th", "January 2026") → 2025-12-30
/// - ("January 2nd", "December 2025") → 2026-01-02
pub fn parse_day_label(label: &str, heading: &str, fallback_year: i32) -> Option<NaiveDate> {
    let (month, day) = parse_month_day(label)?;
    let mut year = heading_year(heading).unwrap_or(fallback_year);

    if heading.contains("January") && month == 12 {
        year -= 1;
    } else if heading.contains("December") && month == 1 {
        year += 1;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every calendar day between two dates, inclusive, in chronological order
pub fn date_range(a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let len = (end - start).num_days() + 1;

    (0..len).map(|offset| start + Duration::days(offset)).collect()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// String representations tried when filling a date input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    /// YYYY-MM-DD
    pub iso: String,
    /// "13 Jan 2026"
    pub long: String,
    /// "1/13/2026"
    pub slash: String,
}

impl DateFormats {
    pub fn new(date: NaiveDate) -> DateFormats {
        let month = short_month_name(date.month()).unwrap_or("Jan");

        DateFormats {
            iso: to_iso(date),
            long: format!("{} {} {}", date.day(), month, date.year()),
            slash: format!("{}/{}/{}", date.month(), date.day(), date.year()),
        }
    }

    /// Parse a `YYYY-MM-DD` query parameter
    pub fn from_iso(value: &str) -> Result<DateFormats, String> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(DateFormats::new)
            .map_err(|e| format!("Invalid date '{}': {}", value, e))
    }
}
