//! Lenient parsing of duration input

use serde_json::Value;

/// Interpret a request body as a duration in seconds.
///
/// Accepts `{"seconds": <value>}`, a bare JSON value, or plain text, and behaves like a
/// numeric input field: integral numbers and numeric text come through, anything
/// else yields `None`. Text is read the same way whether it is bare or quoted. The
/// sign is kept; rejecting non-positive values is up to the engine.
pub fn parse_duration_input(body: &str) -> Option<i64> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields.get("seconds").and_then(coerce_seconds),
        Ok(value) => coerce_seconds(&value),
        Err(_) => parse_numeric_text(body),
    }
}

fn coerce_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_seconds)),
        Value::String(text) => parse_numeric_text(text),
        _ => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(integral_seconds))
}

/// Whole, finite seconds only. Large values are refused before they lose precision.
fn integral_seconds(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15).then(|| value as i64)
}
