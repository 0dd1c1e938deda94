//! Display formatting shared by every appointment view.

use chrono::{NaiveDate, NaiveTime};

const TWENTY_FOUR_HOUR: [&str; 2] = ["%H:%M", "%H:%M:%S"];
const TWELVE_HOUR: &str = "%I:%M %p";

fn parse_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(&time.to_ascii_uppercase(), TWELVE_HOUR)
        .ok()
        .or_else(|| {
            TWENTY_FOUR_HOUR
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
        })
}

/// `"14:30"` → `"2:30 PM"`. Already formatted input passes through unchanged;
/// empty or unparseable input gives `""`.
pub fn to_12_hour(time: &str) -> String {
    parse_time(time)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// `"2:30 PM"` → `"14:30"`; 12 AM is hour 00. Unparseable input gives `""`.
pub fn to_24_hour(time: &str) -> String {
    parse_time(time)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// `90` → `"1h 30m"`, `45` → `"45m"`, `120` → `"2h"`, `0` → `""`.
pub fn to_hours_minutes(total_minutes: u32) -> String {
    match (total_minutes / 60, total_minutes % 60) {
        (0, 0) => String::new(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// The booking backend keys days as `DD-MM-YYYY`.
pub fn backend_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// `"<date> - <12h time>"`. Both parts empty gives `" - "`.
pub fn date_time(date: &str, time: &str) -> String {
    format!("{} - {}", date, to_12_hour(time))
}
