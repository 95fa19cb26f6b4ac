//! Request parameter guards.
//!
//! Each guard either yields the typed value or the 400 the endpoint answers with.
//! Query-string values arrive as text; JSON body values may be numbers or
//! numeric strings and are accepted either way.

use chrono::Datelike;
use serde_json::Value;

use crate::error::ApiError;

pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Non-blank text parameter
pub fn required_text<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Missing required parameter: {}", name))),
    }
}

/// Optional text field; present-but-blank counts as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Positive integer query parameter (pagination)
pub fn positive_int(name: &str, value: Option<&str>) -> Result<i64, ApiError> {
    let raw = required_text(name, value)?;
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ApiError::bad_request(format!("{} must be greater than 0", name))),
        Err(_) => Err(ApiError::bad_request(format!("{} must be a number", name))),
    }
}

/// Exactly 13 decimal digits
pub fn isbn13(raw: &str) -> Result<i64, ApiError> {
    let raw = raw.trim();
    if raw.len() != 13 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("ISBN must be a 13 digit number"));
    }
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("ISBN must be a 13 digit number"))
}

/// Any integer >= 0 (used by the ISBN delete path)
pub fn nonnegative_isbn(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ApiError::bad_request("ISBN must be a non-negative integer")),
    }
}

/// Integer year no later than the current calendar year
pub fn year(raw: &str) -> Result<i32, ApiError> {
    let parsed = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request("Year must be a number"))?;
    if parsed > current_year() {
        return Err(ApiError::bad_request("Year cannot be in the future"));
    }
    Ok(parsed)
}

/// Average rating for an exact match: 0 < r <= 5
pub fn single_rating(raw: &str) -> Result<f64, ApiError> {
    let rating = number(raw).ok_or_else(|| ApiError::bad_request("Rating must be a number"))?;
    if rating <= 0.0 || rating > 5.0 {
        return Err(ApiError::bad_request("Rating must be greater than 0 and at most 5"));
    }
    Ok(rating)
}

/// Inclusive rating window: 0 <= min <= max <= 5
pub fn rating_range(min: &str, max: &str) -> Result<(f64, f64), ApiError> {
    let (Some(min), Some(max)) = (number(min), number(max)) else {
        return Err(ApiError::bad_request("min and max must be numbers"));
    };
    if min < 0.0 || max > 5.0 || min > max {
        return Err(ApiError::bad_request("Ratings must satisfy 0 <= min <= max <= 5"));
    }
    Ok((min, max))
}

fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads a JSON number or a numeric string
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => number(s),
        _ => None,
    }
}

/// Reads a JSON integer or an integral numeric string
pub fn json_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// ISBN from a JSON body: a 13 digit number or string
pub fn json_isbn13(value: &Value) -> Result<i64, ApiError> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => isbn13(&i.to_string()),
            None => Err(ApiError::bad_request("ISBN must be a 13 digit number")),
        },
        Value::String(s) => isbn13(s),
        _ => Err(ApiError::bad_request("ISBN must be a 13 digit number")),
    }
}

/// Year from a JSON body
pub fn json_year(name: &str, value: &Value) -> Result<i32, ApiError> {
    let parsed = json_integer(value)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ApiError::bad_request(format!("{} must be a number", name)))?;
    if parsed > current_year() {
        return Err(ApiError::bad_request(format!("{} cannot be in the future", name)));
    }
    Ok(parsed)
}

/// Nonnegative counter from a JSON body, defaulting to 0 when absent
pub fn json_count(name: &str, value: Option<&Value>) -> Result<i32, ApiError> {
    let Some(value) = value else {
        return Ok(0);
    };
    json_integer(value)
        .and_then(|n| i32::try_from(n).ok())
        .filter(|n| *n >= 0)
        .ok_or_else(|| ApiError::bad_request(format!("{} must be a non-negative integer", name)))
}

/// Average rating from a JSON body (0..=5), defaulting to 0 when absent
pub fn json_average(name: &str, value: Option<&Value>) -> Result<f64, ApiError> {
    let Some(value) = value else {
        return Ok(0.0);
    };
    json_number(value)
        .filter(|n| (0.0..=5.0).contains(n))
        .ok_or_else(|| ApiError::bad_request(format!("{} must be a number between 0 and 5", name)))
}
