//! Numeric coercion for loosely-typed upstream values.

use serde_json::Value;

/// Keep a value only if it is finite.
pub fn finite(n: f64) -> Option<f64> {
    n.is_finite().then_some(n)
}

/// Coerce any JSON value to a finite number.
///
/// Numbers pass through, strings are trimmed and parsed. Anything else,
/// including null, booleans and empty strings, yields `None`.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Coerce a field of an object, treating a missing field as `None`.
pub fn field_number(object: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(to_number)
}

/// Parse text as a finite decimal number.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().and_then(finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(to_number(&json!(14)), Some(14.0));
        assert_eq!(to_number(&json!(-2.5)), Some(-2.5));
        assert_eq!(to_number(&json!(0)), Some(0.0));
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(to_number(&json!("14")), Some(14.0));
        assert_eq!(to_number(&json!(" 7.5 ")), Some(7.5));
        assert_eq!(to_number(&json!("1e2")), Some(100.0));
    }

    #[test]
    fn test_non_numeric_strings() {
        assert_eq!(to_number(&json!("abc")), None);
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("   ")), None);
        assert_eq!(to_number(&json!("12abc")), None);
    }

    #[test]
    fn test_non_finite_strings() {
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("1e999")), None);
    }

    #[test]
    fn test_other_values() {
        assert_eq!(to_number(&Value::Null), None);
        assert_eq!(to_number(&json!(true)), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&json!({"n": 1})), None);
    }

    #[test]
    fn test_field_number_missing() {
        let object = json!({"townHall": "12"});
        let map = object.as_object().unwrap();
        assert_eq!(field_number(map, "townHall"), Some(12.0));
        assert_eq!(field_number(map, "cumAttacksUsed"), None);
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(3.0), Some(3.0));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }

    #[test]
    fn test_coercion_never_yields_non_finite() {
        let inputs = [
            json!(null),
            json!("x"),
            json!("-0"),
            json!(1.7976931348623157e308),
            json!("1.7976931348623157e309"),
            json!({}),
            json!([]),
            json!(false),
        ];
        for input in &inputs {
            if let Some(n) = to_number(input) {
                assert!(n.is_finite(), "{:?} coerced to {}", input, n);
            }
        }
    }
}
