//! Lenient calendar dates as sent by the backend

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// A date cell from the wire.
///
/// Unparseable input is preserved instead of failing the whole record, so a
/// single bad cell only affects its own rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateField {
    Date(NaiveDate),
    Unparsed(String),
}

impl DateField {
    pub fn parse(raw: &str) -> Self {
        match parse_date(raw) {
            Some(d) => DateField::Date(d),
            None => DateField::Unparsed(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateField::Date(d) => Some(*d),
            DateField::Unparsed(_) => None,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(DateField::parse(&s)),
            // Epoch milliseconds
            Value::Number(n) => Some(
                n.as_i64()
                    .and_then(DateTime::from_timestamp_millis)
                    .map(|dt| DateField::Date(dt.with_timezone(&Local).date_naive()))
                    .unwrap_or_else(|| DateField::Unparsed(n.to_string())),
            ),
            // Jackson without the JSR-310 module: [2024, 3, 15]
            Value::Array(parts) => {
                let nums: Vec<i64> = parts.iter().filter_map(Value::as_i64).collect();
                let date = match nums.as_slice() {
                    [y, m, d, ..] => match (i32::try_from(*y), u32::try_from(*m), u32::try_from(*d)) {
                        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
                        _ => None,
                    },
                    _ => None,
                };
                Some(match date {
                    Some(d) => DateField::Date(d),
                    None => DateField::Unparsed(Value::Array(parts).to_string()),
                })
            }
            other => Some(DateField::Unparsed(other.to_string())),
        }
    }
}

/// Parse the date formats the backend is known to produce.
/// Time-of-day is dropped; instants with an offset are converted to local time first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Render a date cell; missing or malformed dates render as `-`
pub fn display_date(field: Option<&DateField>) -> String {
    match field.and_then(DateField::date) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Field deserializer for `Option<DateField>`
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateField>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(DateField::from_value))
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateField::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            DateField::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DateField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(DateField::from_value(value).unwrap_or_else(|| DateField::Unparsed(String::new())))
    }
}

impl From<NaiveDate> for DateField {
    fn from(d: NaiveDate) -> Self {
        DateField::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_known_formats() {
        assert_eq!(parse_date("2024-03-15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024/03/15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15 23:59:59"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T08:00:00"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(" 2024-03-15 "), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_wire_shapes() {
        let f: DateField = serde_json::from_str(r#""2024-01-02""#).unwrap();
        assert_eq!(f, DateField::Date(ymd(2024, 1, 2)));

        let f: DateField = serde_json::from_str("[2024, 1, 2]").unwrap();
        assert_eq!(f, DateField::Date(ymd(2024, 1, 2)));

        let f: DateField = serde_json::from_str(r#""not a date""#).unwrap();
        assert_eq!(f, DateField::Unparsed("not a date".to_string()));
        assert!(f.date().is_none());
    }

    #[test]
    fn test_out_of_range_array_is_unparsed() {
        let f: DateField = serde_json::from_str("[4294969320, 1, 1]").unwrap();
        assert_eq!(f, DateField::Unparsed("[4294969320,1,1]".to_string()));

        let f: DateField = serde_json::from_str("[2024, -1, 1]").unwrap();
        assert!(f.date().is_none());
    }

    #[test]
    fn test_display_date() {
        let good = DateField::Date(ymd(2023, 12, 1));
        let bad = DateField::Unparsed("??".into());
        assert_eq!(display_date(Some(&good)), "2023-12-01");
        assert_eq!(display_date(Some(&bad)), "-");
        assert_eq!(display_date(None), "-");
    }
}
