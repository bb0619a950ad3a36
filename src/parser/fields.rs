//! Total accessors over decoded payload objects. Missing keys and
//! unexpected types fall back to a default instead of failing.

use serde_json::{Map, Number, Value};

pub fn str_or_empty(item: &Map<String, Value>, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A missing key reads as 0. A present key that is null or not a number
/// reads as `None`.
pub fn num_or_zero(item: &Map<String, Value>, key: &str) -> Option<Number> {
    match item.get(key) {
        None => Some(Number::from(0)),
        Some(_) => opt_num(item, key),
    }
}

pub fn opt_num(item: &Map<String, Value>, key: &str) -> Option<Number> {
    match item.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// Object elements of a decoded array; anything else is skipped.
pub fn objects<'a>(value: &'a Value) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    value
        .as_array()
        .map(|a| a.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_object)
}

/// Parse a Dutch-formatted score ("7,4") into a JSON number.
pub fn parse_decimal_comma(raw: &str) -> Option<Number> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().and_then(Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_on_missing_or_wrong_type() {
        let v = json!({"a": "x", "b": 3, "c": null, "d": [1]});
        let m = v.as_object().unwrap();
        assert_eq!(str_or_empty(m, "a"), "x");
        assert_eq!(str_or_empty(m, "zz"), "");
        assert_eq!(str_or_empty(m, "d"), "");
        assert_eq!(num_or_zero(m, "b"), Some(Number::from(3)));
        assert_eq!(opt_num(m, "c"), None);
    }

    #[test]
    fn zero_only_for_missing_keys() {
        let v = json!({"present": null, "text": "n.v.t."});
        let m = v.as_object().unwrap();
        assert_eq!(num_or_zero(m, "absent"), Some(Number::from(0)));
        assert_eq!(num_or_zero(m, "present"), None);
        assert_eq!(num_or_zero(m, "text"), None);
    }

    #[test]
    fn objects_skips_non_objects() {
        let v = json!([{"a": 1}, 2, "x", {"b": 2}]);
        assert_eq!(objects(&v).count(), 2);
        assert_eq!(objects(&json!({"a": 1})).count(), 0);
    }

    #[test]
    fn decimal_comma() {
        assert_eq!(parse_decimal_comma(" 7,4 "), Number::from_f64(7.4));
        assert_eq!(parse_decimal_comma(""), None);
        assert_eq!(parse_decimal_comma("-"), None);
    }
}
