use serde_json::{Number, Value};

/// Returns `true` when the value is a number or a string holding one.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(text) => parse_finite(text).is_some(),
        _ => false,
    }
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Coerces a numeric value into a JSON number.
///
/// Integral text stays integral (`"1e3"` is `1000`, ids up to `u64::MAX` keep
/// every digit); anything else numeric becomes an `f64`. Callers are expected
/// to guard with [`is_numeric`]; non-numeric input yields `None`.
pub fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(num) => Some(num.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Some(Number::from(int));
            }
            if let Ok(int) = trimmed.parse::<u64>() {
                return Some(Number::from(int));
            }
            let float = parse_finite(trimmed)?;
            if float.fract() == 0.0 && float.abs() < MAX_SAFE_INTEGER {
                return Some(Number::from(float as i64));
            }
            Number::from_f64(float)
        }
        _ => None,
    }
}

/// Renders a scalar the way it appears in a formatted (UI) value.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// JavaScript-style truthiness, used where a formatted value may be "empty".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(num) => num.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn boolean_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
