use serde_json::{Map, Value};

/// Canonical text form of a single field value.
///
/// Missing values become the empty string. Values that parse as JSON are
/// re-serialized with sorted object keys and two-space indentation, so
/// payloads that differ only in key order or whitespace normalize to the same
/// text. Numbers keep their exact digits. Anything else is returned unchanged.
pub fn normalize_value(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => serde_json::to_string_pretty(&sort_keys(parsed))
            .unwrap_or_else(|_| raw.to_owned()),
        Err(_) => raw.to_owned(),
    }
}

/// Rebuild objects with keys inserted in lexicographic order.
///
/// The default `Map` is already ordered, but with `preserve_order` enabled
/// anywhere in the build it keeps insertion order instead.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_empty() {
        assert_eq!(normalize_value(None), "");
    }

    #[test]
    fn test_empty_string_stays_empty() {
        assert_eq!(normalize_value(Some("")), "");
    }

    #[test]
    fn test_key_order_and_whitespace_ignored() {
        let a = normalize_value(Some(r#"{"a":1,"b":2}"#));
        let b = normalize_value(Some("{ \"b\" : 2,\n\t\"a\": 1 }"));
        assert_eq!(a, b);
        assert_eq!(a, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let value = normalize_value(Some(r#"{"z":[{"y":1,"x":2}],"m":{}}"#));
        assert_eq!(
            value,
            "{\n  \"m\": {},\n  \"z\": [\n    {\n      \"x\": 2,\n      \"y\": 1\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_scalars_reserialize() {
        assert_eq!(normalize_value(Some(" 42 ")), "42");
        assert_eq!(normalize_value(Some("\"x\"")), "\"x\"");
        assert_eq!(normalize_value(Some("null")), "null");
    }

    #[test]
    fn test_big_integers_keep_every_digit() {
        let a = normalize_value(Some(r#"{"po": 12345678901234567890123}"#));
        let b = normalize_value(Some(r#"{"po": 12345678901234567890124}"#));
        assert_ne!(a, b);
        assert_eq!(a, "{\n  \"po\": 12345678901234567890123\n}");
        assert_eq!(
            normalize_value(Some("0.10000000000000000000001")),
            "0.10000000000000000000001"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "PO number: 4500012345\n  qty 3";
        assert_eq!(normalize_value(Some(text)), text);
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let text = r#"{"a": 1,}"#;
        assert_eq!(normalize_value(Some(text)), text);
    }

    #[test]
    fn test_array_order_is_significant() {
        assert_ne!(
            normalize_value(Some("[1, 2]")),
            normalize_value(Some("[2, 1]"))
        );
    }
}
