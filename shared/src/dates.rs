//! Calendar arithmetic on local wall-clock dates
//!
//! Everything here works on `NaiveDate`/`NaiveDateTime`, which carry the user's
//! local year/month/day directly. Nothing ever passes through UTC, so a date shown
//! on screen is the same date that gets serialized into a query key.

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};

/// Minutes in a full day
pub const DAY_MINUTES: u32 = 24 * 60;

/// Monday of the week containing `date`
///
/// Sunday belongs to the week that started six days earlier.
pub fn get_monday(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// Shift `date` by `days` (negative moves backwards)
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// The seven dates of the week containing `date`, Monday first
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = get_monday(date);
    std::array::from_fn(|i| add_days(monday, i as i64))
}

/// Render `date` as "YYYY-MM-DD"
pub fn format_iso_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a strict "YYYY-MM-DD" string
///
/// Returns `None` on any shape mismatch or on a date that does not exist
/// (e.g. "2025-02-30").
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if !s.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &s[range];
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Format a wall-clock time as 24-hour "HH:MM"
pub fn format_time<T: Timelike>(t: &T) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Minutes elapsed since local midnight (seconds are dropped)
pub fn minutes_from_midnight<T: Timelike>(t: &T) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Header label for a day, e.g. "Wednesday 01/01"
pub fn day_label(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    format!("{} {:02}/{:02}", weekday, date.day(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_get_monday_every_weekday() {
        // 2025-01-06 is a Monday
        for offset in 0..7 {
            let d = add_days(date(2025, 1, 6), offset);
            assert_eq!(get_monday(d), date(2025, 1, 6), "offset {}", offset);
        }
        // Sunday falls back six days, not forward one
        assert_eq!(get_monday(date(2025, 1, 5)), date(2024, 12, 30));
    }

    #[test]
    fn test_get_monday_idempotent() {
        let mut d = date(2024, 2, 20);
        for _ in 0..60 {
            let monday = get_monday(d);
            assert_eq!(get_monday(monday), monday);
            assert_eq!(monday.weekday(), Weekday::Mon);
            d = add_days(d, 1);
        }
    }

    #[test]
    fn test_add_days_crosses_boundaries() {
        assert_eq!(add_days(date(2024, 12, 31), 1), date(2025, 1, 1));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(add_days(date(2025, 1, 15), 0), date(2025, 1, 15));
    }

    #[test]
    fn test_week_days() {
        let days = week_days(date(2025, 1, 1));
        assert_eq!(days[0], date(2024, 12, 30));
        assert_eq!(days[6], date(2025, 1, 5));
    }

    #[test]
    fn test_iso_round_trip() {
        let mut d = date(2023, 12, 25);
        for _ in 0..400 {
            assert_eq!(parse_iso_date(&format_iso_date(d)), Some(d));
            d = add_days(d, 1);
        }
    }

    #[test]
    fn test_parse_iso_rejects_malformed() {
        for bad in [
            "",
            "2025-1-01",
            "2025/01/01",
            "2025-01-01T00:00",
            "20250101",
            "2025-02-30",
            "2025-13-01",
            "+025-01-01",
            "2025-0a-01",
            " 2025-01-1",
        ] {
            assert_eq!(parse_iso_date(bad), None, "{:?}", bad);
        }
        assert_eq!(parse_iso_date("2024-02-29"), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_format_time_zero_pads() {
        let t = NaiveTime::from_hms_opt(7, 5, 59).unwrap();
        assert_eq!(format_time(&t), "07:05");
        assert_eq!(minutes_from_midnight(&t), 425);
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(date(2025, 1, 1)), "Wednesday 01/01");
    }
}
