//! Calendar helpers: local `yyyy-mm-dd` dates and timeline labels.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's local calendar date as `yyyy-mm-dd`.
pub fn today_local() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn is_valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Shift a `yyyy-mm-dd` string by whole days; invalid input is returned unchanged.
pub fn shift_date(s: &str, days: i64) -> String {
    match parse_date(s) {
        Some(d) => (d + Duration::days(days)).format(DATE_FORMAT).to_string(),
        None => s.to_string(),
    }
}

/// Parse the timestamp shapes the space APIs use:
/// RFC 3339, DONKI's `2024-01-01T12:00Z`, NeoWs' `2024-Jan-01 12:34`,
/// and bare dates. Naive forms are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE: [&str; 4] = [
        "%Y-%m-%dT%H:%MZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%b-%d %H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// "Jan 05, 14:30 UTC". Missing input reads "TBD"; unparseable input is
/// shown as-is.
pub fn fmt_utc(s: Option<&str>) -> String {
    match s.filter(|s| !s.is_empty()) {
        None => "TBD".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => format!("{} UTC", dt.format("%b %d, %H:%M")),
            None => raw.to_string(),
        },
    }
}

/// Unix seconds rendered in the local zone: "Jan 05, 14:30 (local)".
pub fn fmt_local_unix(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| format!("{} (local)", dt.format("%b %d, %H:%M")))
}
