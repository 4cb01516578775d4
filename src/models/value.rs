//! Cell values for in-memory tables
//!
//! Source files are read as text; selected columns are then coerced to a
//! typed representation before they take part in filters or calculations.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Type a column can be coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
        };
        write!(f, "{}", name)
    }
}

/// How numbers are written in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Decimal separator ('.' or ',')
    pub decimal_separator: char,
    /// Optional thousands separator, stripped before parsing
    #[serde(default)]
    pub thousands_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: None,
        }
    }
}

impl NumberFormat {
    /// French convention: "1 234,56"
    pub fn french() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separator: Some(' '),
        }
    }

    /// Normalize a raw number into Rust's float syntax
    fn normalize(&self, raw: &str) -> String {
        let space_grouping = self.thousands_separator == Some(' ');
        raw.trim()
            .chars()
            .filter(|c| {
                if Some(*c) == self.thousands_separator {
                    return false;
                }
                // Spreadsheet exports often group with non-breaking spaces
                !(space_grouping && (*c == '\u{a0}' || *c == '\u{202f}'))
            })
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    /// Parse a decimal number
    pub fn parse_decimal(&self, raw: &str) -> Result<f64, String> {
        let normalized = self.normalize(raw);
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Could not parse decimal: '{}'", raw))
    }

    /// Parse an integer, accepting a zero fractional part ("31.0")
    pub fn parse_integer(&self, raw: &str) -> Result<i64, String> {
        let normalized = self.normalize(raw);
        if let Ok(v) = normalized.parse::<i64>() {
            return Ok(v);
        }
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
            _ => Err(format!("Could not parse integer: '{}'", raw)),
        }
    }
}

/// Parse a date string using multiple format attempts
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();

    let date_formats = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(format!("Could not parse date: '{}'", s))
}

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
}

impl Value {
    /// Build a cell from raw source text; empty fields are null
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Null
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The type of this cell, or None for null
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(ColumnType::Text),
            Self::Integer(_) => Some(ColumnType::Integer),
            Self::Decimal(_) => Some(ColumnType::Decimal),
            Self::Date(_) => Some(ColumnType::Date),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whole number held by a numeric cell; None if fractional or not numeric
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Decimal(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Check whether two cells can be compared by a filter predicate
    pub fn comparable_with(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => true,
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (a, b) => a.column_type() == b.column_type(),
        }
    }

    /// Order two non-null cells of comparable types
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
            _ => None,
        }
    }

    /// Equality used by filters: numeric cells compare by value, null matches nothing
    pub fn matches(&self, other: &Value) -> bool {
        !self.is_null() && self.compare(other) == Some(Ordering::Equal)
    }

    /// Coerce a text cell to the requested type
    pub fn coerce(&self, target: ColumnType, numbers: &NumberFormat) -> Result<Value, String> {
        let raw = match self {
            Self::Null => return Ok(Self::Null),
            Self::Text(s) => s.as_str(),
            other => {
                return match (other, target) {
                    (v, t) if v.column_type() == Some(t) => Ok(v.clone()),
                    (Self::Integer(v), ColumnType::Decimal) => Ok(Self::Decimal(*v as f64)),
                    (v, ColumnType::Integer) => v
                        .as_whole_number()
                        .map(Self::Integer)
                        .ok_or_else(|| format!("Cannot convert {} to integer", v)),
                    (v, ColumnType::Text) => Ok(Self::Text(v.to_string())),
                    (v, t) => Err(format!("Cannot convert {} to {}", v, t)),
                };
            }
        };

        match target {
            ColumnType::Text => Ok(self.clone()),
            ColumnType::Integer => numbers.parse_integer(raw).map(Self::Integer),
            ColumnType::Decimal => numbers.parse_decimal(raw).map(Self::Decimal),
            ColumnType::Date => parse_date(raw).map(Self::Date),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Decimal(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_french_decimal() {
        let fr = NumberFormat::french();
        assert_eq!(fr.parse_decimal("1 234,56").unwrap(), 1234.56);
        assert_eq!(fr.parse_decimal("-12,5").unwrap(), -12.5);
        assert_eq!(fr.parse_decimal("1\u{a0}000,00").unwrap(), 1000.0);
        assert!(fr.parse_decimal("abc").is_err());
    }

    #[test]
    fn test_parse_integer_accepts_zero_fraction() {
        let plain = NumberFormat::default();
        assert_eq!(plain.parse_integer("31").unwrap(), 31);
        assert_eq!(plain.parse_integer("51.0").unwrap(), 51);
        assert!(plain.parse_integer("51.5").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2019-03-15").unwrap(), date(2019, 3, 15));
        assert_eq!(parse_date("15/03/2019").unwrap(), date(2019, 3, 15));
        assert_eq!(parse_date("2019-03-15T10:30:00").unwrap(), date(2019, 3, 15));
        assert_eq!(parse_date("2019-03-15T10:30:00+02:00").unwrap(), date(2019, 3, 15));
        assert!(parse_date("next tuesday").is_err());
    }

    #[test]
    fn test_from_raw_empty_is_null() {
        assert!(Value::from_raw("").is_null());
        assert!(Value::from_raw("   ").is_null());
        assert_eq!(Value::from_raw("x"), Value::text("x"));
    }

    #[test]
    fn test_coerce() {
        let numbers = NumberFormat::default();
        assert_eq!(
            Value::text("2018-01-02").coerce(ColumnType::Date, &numbers).unwrap(),
            Value::Date(date(2018, 1, 2))
        );
        assert_eq!(
            Value::text("12.0").coerce(ColumnType::Decimal, &numbers).unwrap(),
            Value::Decimal(12.0)
        );
        assert_eq!(Value::Null.coerce(ColumnType::Integer, &numbers).unwrap(), Value::Null);
        assert!(Value::text("n/a").coerce(ColumnType::Date, &numbers).is_err());
        assert_eq!(
            Value::Integer(4).coerce(ColumnType::Decimal, &numbers).unwrap(),
            Value::Decimal(4.0)
        );
    }

    #[test]
    fn test_matches_and_compare() {
        assert!(Value::Integer(31).matches(&Value::Decimal(31.0)));
        assert!(!Value::Null.matches(&Value::Null));
        assert!(!Value::text("31").matches(&Value::Integer(31)));
        assert_eq!(
            Value::Date(date(2018, 1, 2)).compare(&Value::Date(date(2018, 1, 1))),
            Some(Ordering::Greater)
        );
        assert!(Value::text("a").comparable_with(&Value::text("b")));
        assert!(!Value::text("2018-01-01").comparable_with(&Value::Date(date(2018, 1, 1))));
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(Value::Decimal(12.0).as_whole_number(), Some(12));
        assert_eq!(Value::Decimal(12.5).as_whole_number(), None);
        assert_eq!(Value::text("12").as_whole_number(), None);
    }
}
