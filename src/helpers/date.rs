//! Date helper functions
//!
//! Publish dates are stored in UTC and shown in the site's timezone, with
//! month names in the site's language.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_ID_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn month_name(language: &str, month0: usize, short: bool) -> String {
    match (language, short) {
        ("id", false) => MONTHS_ID[month0].to_string(),
        ("id", true) => MONTHS_ID_SHORT[month0].to_string(),
        (_, false) => MONTHS_EN[month0].to_string(),
        (_, true) => MONTHS_EN[month0].chars().take(3).collect(),
    }
}

/// Format a date like "16 October 2026"
///
/// # Examples
/// ```ignore
/// full_date(&date, &chrono_tz::Asia::Jakarta, "id") // -> "16 Oktober 2026"
/// ```
pub fn full_date(date: &DateTime<Utc>, tz: &Tz, language: &str) -> String {
    let local = tz.from_utc_datetime(&date.naive_utc());
    format!(
        "{} {} {}",
        local.day(),
        month_name(language, local.month0() as usize, false),
        local.year()
    )
}

/// Format a date like "16 Oct 2026"
pub fn short_date(date: &DateTime<Utc>, tz: &Tz, language: &str) -> String {
    let local = tz.from_utc_datetime(&date.naive_utc());
    format!(
        "{} {} {}",
        local.day(),
        month_name(language, local.month0() as usize, true),
        local.year()
    )
}

/// Format a date in ISO 8601 format, for `<time datetime>` and meta tags
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
