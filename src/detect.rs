//! Per-cell type detection.
//!
//! [`detect`] classifies one trimmed text value into
//! {string, number(integer|decimal), boolean, date, time, datetime} with a
//! strict first-match-wins order. It never fails: text that fits nothing is
//! truthfully a string. Date/time/datetime detection is driven entirely by
//! user-configured format templates compiled into a [`FormatMatcher`];
//! without one, such values classify as strings.

use std::{collections::HashMap, fmt};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{data::Value, options::DateFormats};

/// Column/cell type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    String,
    Number,
    Boolean,
    Date,
    Time,
    DateTime,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::String => "string",
            CellType::Number => "number",
            CellType::Boolean => "boolean",
            CellType::Date => "date",
            CellType::Time => "time",
            CellType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sub-format of a `number` cell or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    Integer,
    Decimal,
}

/// A classified cell: type tag, numeric sub-format, and the decoded value.
/// Produced per cell and consumed immediately by the schema tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedCell {
    pub kind: CellType,
    pub number_format: Option<NumberFormat>,
    pub value: Value,
}

impl TypedCell {
    /// Cell absent from its row (shorter than the schema).
    pub fn null() -> Self {
        Self {
            kind: CellType::String,
            number_format: None,
            value: Value::Null,
        }
    }

    fn string(value: String) -> Self {
        Self {
            kind: CellType::String,
            number_format: None,
            value: Value::String(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Classifies one raw cell. First match wins:
/// empty → boolean → number → time → date → datetime → string.
///
/// Numeric sub-format is `integer` only when the literal has no decimal point
/// and the parsed value has no fractional part, so exponential literals that
/// evaluate to whole numbers ("1e3") classify as integer even though their
/// source text carries an exponent. That coarse per-cell policy is
/// deliberate; a full-column scan was explicitly declined.
pub fn detect(raw: &str, formats: Option<&FormatMatcher>) -> TypedCell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TypedCell::string(String::new());
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return TypedCell {
            kind: CellType::Boolean,
            number_format: None,
            value: Value::Boolean(true),
        };
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return TypedCell {
            kind: CellType::Boolean,
            number_format: None,
            value: Value::Boolean(false),
        };
    }

    if let Some((value, format)) = classify_number(trimmed) {
        return TypedCell {
            kind: CellType::Number,
            number_format: Some(format),
            value,
        };
    }

    if let Some(matcher) = formats
        && let Some(kind) = matcher.classify(trimmed)
    {
        // Date-ish values keep their original text; no normalization.
        return TypedCell {
            kind,
            number_format: None,
            value: Value::String(trimmed.to_string()),
        };
    }

    TypedCell::string(trimmed.to_string())
}

/// Parses `trimmed` as a numeric literal (optionally exponential). Returns
/// `None` for anything containing characters outside the literal grammar, so
/// chrono-style tokens like "inf" or "nan" stay strings.
fn classify_number(trimmed: &str) -> Option<(Value, NumberFormat)> {
    let mut has_digit = false;
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => has_digit = true,
            '.' | 'e' | 'E' | '+' | '-' => {}
            _ => return None,
        }
    }
    if !has_digit {
        return None;
    }

    let parsed: f64 = trimmed.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }

    let format = if !trimmed.contains('.') && parsed.fract() == 0.0 {
        NumberFormat::Integer
    } else {
        NumberFormat::Decimal
    };

    let value = if parsed.fract() == 0.0 && parsed.abs() <= i64::MAX as f64 {
        Value::Integer(parsed as i64)
    } else {
        Value::Float(parsed)
    };
    Some((value, format))
}

/// Compiled date/time/datetime templates. Built once per parser; each
/// distinct template string compiles to exactly one anchored regex.
#[derive(Debug, Clone)]
pub struct FormatMatcher {
    time: Vec<Regex>,
    date: Vec<Regex>,
    datetime: Vec<Regex>,
}

impl FormatMatcher {
    pub fn new(formats: &DateFormats) -> crate::Result<Self> {
        let mut cache: HashMap<String, Regex> = HashMap::new();
        Ok(Self {
            time: compile_all(&formats.time, &mut cache)?,
            date: compile_all(&formats.date, &mut cache)?,
            datetime: compile_all(&formats.datetime, &mut cache)?,
        })
    }

    /// Time templates are checked first (bare times do not survive a generic
    /// date parse), then date templates; datetime templates apply only to
    /// values that a generic calendar parse accepts.
    fn classify(&self, trimmed: &str) -> Option<CellType> {
        if self.time.iter().any(|re| re.is_match(trimmed)) {
            return Some(CellType::Time);
        }
        if self.date.iter().any(|re| re.is_match(trimmed)) {
            return Some(CellType::Date);
        }
        if parses_as_calendar_value(trimmed)
            && self.datetime.iter().any(|re| re.is_match(trimmed))
        {
            return Some(CellType::DateTime);
        }
        None
    }
}

fn compile_all(templates: &[String], cache: &mut HashMap<String, Regex>) -> crate::Result<Vec<Regex>> {
    templates
        .iter()
        .map(|template| {
            if let Some(re) = cache.get(template) {
                return Ok(re.clone());
            }
            let re = compile_template(template)?;
            cache.insert(template.clone(), re.clone());
            Ok(re)
        })
        .collect()
}

const TEMPLATE_TOKENS: &[(&str, &str)] = &[
    ("YYYY", r"\d{4}"),
    ("SSS", r"\d{3}"),
    ("MM", r"\d{2}"),
    ("DD", r"\d{2}"),
    ("HH", r"\d{2}"),
    ("mm", r"\d{2}"),
    ("ss", r"\d{2}"),
];

fn compile_template(template: &str) -> crate::Result<Regex> {
    let mut pattern = String::with_capacity(template.len() * 2 + 2);
    pattern.push('^');
    let mut rest = template;
    'outer: while !rest.is_empty() {
        for (token, digits) in TEMPLATE_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                pattern.push_str(digits);
                rest = tail;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        let mut literal = [0u8; 4];
        pattern.push_str(&regex::escape(ch.encode_utf8(&mut literal)));
        rest = &rest[ch.len_utf8()..];
    }
    pattern.push('$');
    Ok(Regex::new(&pattern)?)
}

/// Generic "is this some valid calendar value" gate for datetime detection,
/// using a list of candidate chrono formats.
fn parses_as_calendar_value(value: &str) -> bool {
    parse_naive_datetime(value).is_some() || parse_naive_date(value).is_some()
}

fn parse_naive_date(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%SZ",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
