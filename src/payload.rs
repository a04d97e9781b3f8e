/// Calendar page-load payload rewriting
use serde_json::Value;

pub const WEEKENDS_FILTER_KEY: &str = "weekends";

/// Outcome of rewriting a calendar payload
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadEdit {
    /// The filter was found; the new JSON text to write back
    Rewritten(String),
    /// No `filters` array or no filter with the requested key
    Untouched,
}

/// Force `selected: false` on the filter whose `filterKey` matches
///
/// Every other field of the payload is preserved. Running this on an already
/// rewritten payload leaves the filter deselected.
pub fn deselect_filter(json: &str, filter_key: &str) -> Result<PayloadEdit, String> {
    let mut data: Value = serde_json::from_str(json)
        .map_err(|e| format!("Failed to parse calendar data: {}", e))?;

    let filter = data
        .get_mut("filters")
        .and_then(Value::as_array_mut)
        .and_then(|filters| {
            filters
                .iter_mut()
                .find(|f| f.get("filterKey").and_then(Value::as_str) == Some(filter_key))
        });

    let Some(Value::Object(filter)) = filter else {
        return Ok(PayloadEdit::Untouched);
    };

    filter.insert("selected".to_string(), Value::Bool(false));

    serde_json::to_string(&data)
        .map(PayloadEdit::Rewritten)
        .map_err(|e| format!("Failed to serialize calendar data: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rewritten(edit: PayloadEdit) -> Value {
        match edit {
            PayloadEdit::Rewritten(text) => serde_json::from_str(&text).unwrap(),
            PayloadEdit::Untouched => panic!("expected payload to be rewritten"),
        }
    }

    #[test]
    fn test_deselect_weekends_filter() {
        let payload = json!({
            "filters": [
                {"filterKey": "timeOff", "selected": true},
                {"filterKey": "weekends", "selected": true, "label": "Weekends"}
            ],
            "employees": [1, 2, 3]
        });

        let result = rewritten(deselect_filter(&payload.to_string(), WEEKENDS_FILTER_KEY).unwrap());

        assert_eq!(result["filters"][1]["selected"], json!(false));
        assert_eq!(result["filters"][1]["label"], json!("Weekends"));
        assert_eq!(result["filters"][0]["selected"], json!(true));
        assert_eq!(result["employees"], json!([1, 2, 3]));
    }

    #[test]
    fn test_deselect_is_idempotent() {
        let payload = json!({"filters": [{"filterKey": "weekends", "selected": true}]}).to_string();

        let first = match deselect_filter(&payload, WEEKENDS_FILTER_KEY).unwrap() {
            PayloadEdit::Rewritten(text) => text,
            PayloadEdit::Untouched => panic!("expected rewrite"),
        };
        let second = rewritten(deselect_filter(&first, WEEKENDS_FILTER_KEY).unwrap());

        assert_eq!(second["filters"][0]["selected"], json!(false));
    }

    #[test]
    fn test_missing_selected_field_is_added() {
        let payload = json!({"filters": [{"filterKey": "weekends"}]}).to_string();
        let result = rewritten(deselect_filter(&payload, WEEKENDS_FILTER_KEY).unwrap());

        assert_eq!(result["filters"][0]["selected"], json!(false));
    }

    #[test]
    fn test_untouched_without_filter() {
        let no_filters = json!({"employees": []}).to_string();
        let other_filters = json!({"filters": [{"filterKey": "holidays", "selected": true}]}).to_string();
        let not_array = json!({"filters": {"filterKey": "weekends"}}).to_string();

        assert_eq!(deselect_filter(&no_filters, WEEKENDS_FILTER_KEY), Ok(PayloadEdit::Untouched));
        assert_eq!(deselect_filter(&other_filters, WEEKENDS_FILTER_KEY), Ok(PayloadEdit::Untouched));
        assert_eq!(deselect_filter(&not_array, WEEKENDS_FILTER_KEY), Ok(PayloadEdit::Untouched));
    }

    #[test]
    fn test_malformed_json() {
        assert!(deselect_filter("{not json", WEEKENDS_FILTER_KEY).is_err());
    }
}
