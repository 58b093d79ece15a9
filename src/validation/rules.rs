//! Scalar field rules
//!
//! Pure checks for a single non-null value. Each returns the user-facing
//! message on failure; the caller decides the path it is reported at.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::schema::OptionSet;

/// Slug shape: lowercase alphanumeric words joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";
/// `#rgb` or `#rrggbb`.
pub const HEX_COLOR_PATTERN: &str = r"^#([A-Fa-f0-9]{3}|[A-Fa-f0-9]{6})$";
/// 24-hour `HH:MM`.
pub const TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]$";

const NUMERIC_PATTERN: &str = r"^\s*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?\s*$";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern compiles"))
}

fn slug_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, SLUG_PATTERN)
}

fn hex_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, HEX_COLOR_PATTERN)
}

fn time_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, TIME_PATTERN)
}

fn numeric_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, NUMERIC_PATTERN)
}

/// Outcome of a single rule.
pub type RuleResult = Result<(), String>;

pub fn string<'v>(value: &'v Value, label: &str) -> Result<&'v str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("The {} field must be a string.", label))
}

/// Numbers and numeric strings.
pub fn numeric(value: &Value, label: &str) -> RuleResult {
    let ok = match value {
        Value::Number(_) => true,
        Value::String(s) => numeric_regex().is_match(s),
        _ => false,
    };
    ok.then_some(())
        .ok_or_else(|| format!("The {} field must be a number.", label))
}

/// `true`, `false`, `1`, `0`, `"1"`, `"0"`.
pub fn boolean(value: &Value, label: &str) -> RuleResult {
    let ok = match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    };
    ok.then_some(())
        .ok_or_else(|| format!("The {} field must be true or false.", label))
}

/// Dates, naive date-times and RFC 3339 timestamps.
pub fn date_like(value: &Value, label: &str) -> RuleResult {
    let text = string(value, label)?.trim();
    let ok = NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok());
    ok.then_some(())
        .ok_or_else(|| format!("The {} field must be a valid date.", label))
}

pub fn time(value: &Value, label: &str) -> RuleResult {
    let text = string(value, label)?;
    time_regex()
        .is_match(text)
        .then_some(())
        .ok_or_else(|| format!("The {} field must be a time in HH:MM format.", label))
}

/// Lists and maps.
pub fn json(value: &Value, label: &str) -> RuleResult {
    (value.is_array() || value.is_object())
        .then_some(())
        .ok_or_else(|| format!("The {} field must be an array.", label))
}

pub fn choice(value: &Value, label: &str, options: &OptionSet) -> RuleResult {
    let text = string(value, label)?;
    options
        .allows(text)
        .then_some(())
        .ok_or_else(|| format!("The selected {} is invalid.", label))
}

pub fn slug(value: &Value, label: &str) -> RuleResult {
    let text = string(value, label)?;
    slug_regex().is_match(text).then_some(()).ok_or_else(|| {
        format!(
            "The {} field must only contain lowercase letters, numbers and single hyphens.",
            label
        )
    })
}

pub fn password(value: &Value, label: &str, min_length: usize) -> RuleResult {
    let text = string(value, label)?;
    (text.chars().count() >= min_length)
        .then_some(())
        .ok_or_else(|| format!("The {} field must be at least {} characters.", label, min_length))
}

/// Palette member when a palette is declared, otherwise a hex colour.
pub fn color(value: &Value, label: &str, palette: &OptionSet) -> RuleResult {
    let text = string(value, label)?;
    if palette.is_open() {
        hex_regex()
            .is_match(text)
            .then_some(())
            .ok_or_else(|| format!("The {} field must be a hex colour.", label))
    } else {
        palette
            .allows(text)
            .then_some(())
            .ok_or_else(|| format!("The selected {} is invalid.", label))
    }
}

/// Reads a reference id: an integer, or a string of digits.
pub fn reference_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    }
}

pub fn integer_id(value: &Value, label: &str) -> Result<i64, String> {
    reference_id(value).ok_or_else(|| format!("The {} field must be an integer.", label))
}
