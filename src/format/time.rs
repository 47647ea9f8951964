use chrono::{DateTime, Local, TimeZone};

pub(crate) fn format_display_time(value: &str) -> String {
    format_in(value, &Local, "%Y-%m-%d %H:%M:%S")
}

/// Long-form local date and time, e.g. `January 5, 2024 14:30`.
pub(crate) fn format_long_time(value: &str) -> String {
    format_long_time_in(value, &Local)
}

pub(crate) fn format_long_time_in<Tz: TimeZone>(value: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_in(value, tz, "%B %-d, %Y %H:%M")
}

fn format_in<Tz: TimeZone>(value: &str, tz: &Tz, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => timestamp.with_timezone(tz).format(pattern).to_string(),
        Err(_) => value.to_string(),
    }
}
