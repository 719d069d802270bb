use serde_json::{Map, Value};

/// Layers `overlay` on top of `base`.
///
/// Nested objects are merged key by key; any other value (arrays included)
/// replaces what was there.
pub fn merge_parameters(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_parameters(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A parameter counts as present unless it is absent, `null` or an empty string.
pub fn is_present(parameters: &Map<String, Value>, field: &str) -> bool {
    match parameters.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Required fields that are not present after merging, in declaration order.
pub fn missing_fields(parameters: &Map<String, Value>, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|field| !is_present(parameters, field))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn overlay_wins_and_nested_objects_merge() {
        let mut base = object(json!({
            "requestMethod": "GET",
            "options": { "timeout": 1000, "retry": true },
            "list": [1, 2]
        }));
        merge_parameters(
            &mut base,
            &object(json!({
                "requestMethod": "POST",
                "options": { "timeout": 5000 },
                "list": [3]
            })),
        );
        assert_eq!(base["requestMethod"], json!("POST"));
        assert_eq!(base["options"], json!({ "timeout": 5000, "retry": true }));
        assert_eq!(base["list"], json!([3]));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let params = object(json!({ "a": "", "b": null, "c": 0, "d": "x" }));
        let required: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(missing_fields(&params, &required), vec!["a", "b", "e"]);
    }
}
