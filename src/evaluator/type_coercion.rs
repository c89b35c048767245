use serde_json::Value;

/// Truthiness of a JSON value, as seen by condition gates and bare-path
/// expressions.
///
/// Falsy: `null`, `false`, `0`, `""`, `[]`. Everything else is truthy,
/// including empty objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Render a JSON value as display text. Strings drop their quotes, `null`
/// becomes the empty string, containers serialize compactly.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Convert a value to f64 where a numeric reading exists.
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// Strict equality over optional values, where `None` stands for an
/// undefined path. Undefined equals only undefined; numbers compare as
/// f64 with an epsilon; all other pairs compare structurally.
pub fn loosely_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => a == b,
        },
        (Some(a), Some(b)) => a == b,
    }
}
