//! FILENAME: core/engine/src/date_range.rs
//! PURPOSE: Date-range pre-filter applied before row filters and aggregation.
//! CONTEXT: Day boundaries are computed in UTC. Offsets in RFC 3339 strings
//! are normalized to UTC before comparison.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::Value;

/// Naive date-time layouts accepted after RFC 3339 fails.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Persisted `dateRangeConfig` of a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeConfig {
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl DateRangeConfig {
    pub fn new(attribute: impl Into<String>, start_date: Option<&str>, end_date: Option<&str>) -> Self {
        DateRangeConfig {
            attribute: attribute.into(),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    /// Resolves the configured bounds to `[start of day, end of day]`.
    /// A bound that does not parse is treated as unset.
    pub fn bounds(&self) -> DateBounds {
        let start = self
            .start_date
            .as_deref()
            .and_then(parse_date_text)
            .map(|dt| dt.date().and_time(NaiveTime::MIN));
        let end = self
            .end_date
            .as_deref()
            .and_then(parse_date_text)
            .and_then(|dt| end_of_day(dt.date()));
        DateBounds { start, end }
    }

    /// True when the filter would drop anything at all.
    pub fn is_active(&self) -> bool {
        !self.attribute.is_empty() && self.bounds().is_bounded()
    }
}

/// Inclusive range resolved from a `DateRangeConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateBounds {
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| instant >= start) && self.end.map_or(true, |end| instant <= end)
    }
}

fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).map(|t| date.and_time(t))
}

/// Parses a row value as an instant: numbers are epoch milliseconds, text is
/// an ISO 8601 date or date-time.
pub fn parse_date_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(ms.trunc() as i64).map(|dt| dt.naive_utc())
        }
        Value::Text(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Keeps rows whose `config.attribute` falls inside the configured range.
///
/// Without any usable bound this is a passthrough. With a bound, rows whose
/// date is missing or unparsable are dropped.
pub fn filter_by_date_range(rows: &[Row], config: &DateRangeConfig) -> Vec<Row> {
    let bounds = config.bounds();
    if config.attribute.is_empty() || !bounds.is_bounded() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| {
            parse_date_value(row.value(&config.attribute))
                .map(|instant| bounds.contains(instant))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn orders() -> Vec<Row> {
        vec![
            row! { "id" => 1.0, "date" => "2024-03-01" },
            row! { "id" => 2.0, "date" => "2024-03-15T23:30:00Z" },
            row! { "id" => 3.0, "date" => "2024-03-16T00:00:00Z" },
            row! { "id" => 4.0, "date" => "not a date" },
            row! { "id" => 5.0 },
            // 2024-03-10T12:00:00Z
            row! { "id" => 6.0, "date" => 1_710_072_000_000.0 },
        ]
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.value("id").to_display_string()).collect()
    }

    #[test]
    fn test_inclusive_day_bounds() {
        let config = DateRangeConfig::new("date", Some("2024-03-01"), Some("2024-03-15"));
        assert_eq!(ids(&filter_by_date_range(&orders(), &config)), vec!["1", "2", "6"]);
    }

    #[test]
    fn test_open_ended() {
        let config = DateRangeConfig::new("date", Some("2024-03-11"), None);
        assert_eq!(ids(&filter_by_date_range(&orders(), &config)), vec!["2", "3"]);

        let config = DateRangeConfig::new("date", None, Some("2024-03-10"));
        assert_eq!(ids(&filter_by_date_range(&orders(), &config)), vec!["1", "6"]);
    }

    #[test]
    fn test_no_bounds_is_passthrough() {
        let config = DateRangeConfig::new("date", None, None);
        assert!(!config.is_active());
        assert_eq!(filter_by_date_range(&orders(), &config).len(), 6);

        let garbage = DateRangeConfig::new("date", Some("soon"), None);
        assert_eq!(filter_by_date_range(&orders(), &garbage).len(), 6);
    }

    #[test]
    fn test_offsets_normalized() {
        let value = Value::from("2024-03-15T23:30:00-02:00");
        let parsed = parse_date_value(&value).unwrap();
        assert_eq!(parsed.to_string(), "2024-03-16 01:30:00");
    }
}
