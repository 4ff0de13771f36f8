//! Date display for the studio.
//!
//! The studio works in a single timezone, so everything shown to users is
//! localized to it rather than to the viewer's machine.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Resolve the configured studio timezone, falling back to the system
/// timezone when it is missing or unknown.
pub fn studio_timezone(name: Option<&str>) -> TimeZone {
    match name {
        Some(name) => TimeZone::get(name).unwrap_or_else(|e| {
            tracing::warn!("unknown studio timezone {name:?}: {e}");
            TimeZone::system()
        }),
        None => TimeZone::system(),
    }
}

/// Current date in the studio.
pub fn today(tz: &TimeZone) -> Date {
    Timestamp::now().to_zoned(tz.clone()).date()
}

/// Day-first numeric date, e.g. "05/03/2024".
pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// Day-first date and 24h time in the studio timezone.
pub fn format_timestamp(timestamp: Timestamp, tz: &TimeZone) -> String {
    timestamp
        .to_zoned(tz.clone())
        .strftime("%d/%m/%Y %H:%M")
        .to_string()
}

/// Month and year, e.g. "March 2024".
pub fn month_label(date: Date) -> String {
    date.strftime("%B %Y").to_string()
}

/// Turn a fee period like "2024-03" into "March 2024". Periods that aren't
/// in that form are returned unchanged.
pub fn period_label(period: &str) -> String {
    match format!("{}-01", period.trim()).parse::<Date>() {
        Ok(first_day) => month_label(first_day),
        Err(_) => period.to_string(),
    }
}

/// Whole days from `from` until `to`; negative when `to` is in the past.
pub fn days_until(from: Date, to: Date) -> i32 {
    (to - from).get_days()
}
