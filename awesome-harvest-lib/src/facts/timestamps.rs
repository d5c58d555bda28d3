use chrono::{DateTime, NaiveDateTime, Utc};

/// Format of every timestamp written to the CSV outputs.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d, %H:%M:%S";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an HTTP `Last-Modified` style date.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole days elapsed between `then` and `now`.
#[must_use]
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_days()
}
