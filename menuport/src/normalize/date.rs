//! Date and recurrence parsing for the Date column

use crate::config::DateRollover;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// When a menu item is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDate {
    On(NaiveDate),
    Daily,
    Weekly(Weekday),
}

impl fmt::Display for MenuDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            MenuDate::Daily => f.write_str("Daily"),
            MenuDate::Weekly(day) => write!(f, "Weekly-{}", weekday_name(*day)),
        }
    }
}

impl FromStr for MenuDate {
    type Err = String;

    /// Parse the canonical form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("daily") {
            return Ok(MenuDate::Daily);
        }
        if let Some(day) = parse_weekly(s) {
            return Ok(MenuDate::Weekly(day));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(MenuDate::On)
            .map_err(|_| format!("invalid menu date: {}", s))
    }
}

impl Serialize for MenuDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MenuDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    if name.len() < 3 {
        return None;
    }
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .find(|day| weekday_name(*day).to_lowercase().starts_with(&name))
}

fn parse_month(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let name = name.trim().trim_end_matches('.').to_lowercase();
    if name.len() < 3 {
        return None;
    }
    // "Sept" is common enough to accept alongside "Sep"
    let name = if name == "sept" { "sep".to_string() } else { name };
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}

fn parse_weekly(s: &str) -> Option<Weekday> {
    static WEEKLY: OnceLock<Regex> = OnceLock::new();
    let re = WEEKLY.get_or_init(|| Regex::new(r"(?i)^weekly\s*[-:]?\s*([a-z]+)$").unwrap());
    let caps = re.captures(s.trim())?;
    parse_weekday(&caps[1])
}

/// Convert a spreadsheet serial day number to a date (1900 date system)
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    // Day 60 is the phantom 29 Feb 1900; earlier serials sit one day later
    let epoch = match days {
        60 => return None,
        ..60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_signed(Duration::days(days))
}

/// Parse free text from the Date column.
///
/// `today` anchors human forms without a year ("16th Sep").
pub fn parse_date_text(text: &str, today: NaiveDate, rollover: DateRollover) -> Option<MenuDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.eq_ignore_ascii_case("daily") {
        return Some(MenuDate::Daily);
    }
    if let Some(day) = parse_weekly(text) {
        return Some(MenuDate::Weekly(day));
    }

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(MenuDate::On(date));
        }
    }

    // ISO timestamps from spreadsheet date cells ("2024-09-16T00:00:00")
    if let Some((date_part, _)) = text.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Some(MenuDate::On(date));
        }
    }

    parse_human_date(text, today, rollover).map(MenuDate::On)
}

fn parse_human_date(text: &str, today: NaiveDate, rollover: DateRollover) -> Option<NaiveDate> {
    static DAY_FIRST: OnceLock<Regex> = OnceLock::new();
    static MONTH_FIRST: OnceLock<Regex> = OnceLock::new();

    let day_first = DAY_FIRST.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2})(?:st|nd|rd|th)?\s*[-\s]\s*([a-z]+)\.?,?(?:\s+(\d{4}))?$")
            .unwrap()
    });
    let month_first = MONTH_FIRST.get_or_init(|| {
        Regex::new(r"(?i)^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?(?:\s+(\d{4}))?$").unwrap()
    });

    let (day, month, year) = if let Some(caps) = day_first.captures(text) {
        (
            caps[1].parse::<u32>().ok()?,
            parse_month(&caps[2])?,
            caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()),
        )
    } else if let Some(caps) = month_first.captures(text) {
        (
            caps[2].parse::<u32>().ok()?,
            parse_month(&caps[1])?,
            caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()),
        )
    } else {
        return None;
    };

    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if rollover == DateRollover::KeepPast {
        return NaiveDate::from_ymd_opt(today.year(), month, day);
    }
    // Next occurrence on or after today; 29 Feb can be up to eight years out
    (today.year()..=today.year() + 8)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
        .find(|date| *date >= today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(text: &str) -> Option<MenuDate> {
        parse_date_text(text, ymd(2024, 6, 1), DateRollover::NextYear)
    }

    #[test]
    fn test_recurrence_tags() {
        assert_eq!(parse("Daily"), Some(MenuDate::Daily));
        assert_eq!(parse("daily"), Some(MenuDate::Daily));
        assert_eq!(parse("Weekly-Monday"), Some(MenuDate::Weekly(Weekday::Mon)));
        assert_eq!(parse("weekly - fri"), Some(MenuDate::Weekly(Weekday::Fri)));
        assert_eq!(parse("Weekly-Someday"), None);
    }

    #[test]
    fn test_explicit_dates() {
        assert_eq!(parse("2024-09-16"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(parse("16/09/2024"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(parse("16-09-2024"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(
            parse("2024-09-16T00:00:00"),
            Some(MenuDate::On(ymd(2024, 9, 16)))
        );
        assert_eq!(parse("2024-02-30"), None);
    }

    #[test]
    fn test_human_dates() {
        assert_eq!(parse("16th Sep"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(parse("16 September"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(parse("Sep 16"), Some(MenuDate::On(ymd(2024, 9, 16))));
        assert_eq!(parse("1st Sept"), Some(MenuDate::On(ymd(2024, 9, 1))));
        assert_eq!(parse("16th Sep 2023"), Some(MenuDate::On(ymd(2023, 9, 16))));
        assert_eq!(parse("16th Foo"), None);
        assert_eq!(parse("tomorrow"), None);
    }

    #[test]
    fn test_rollover() {
        let today = ymd(2024, 10, 1);
        assert_eq!(
            parse_date_text("16th Sep", today, DateRollover::NextYear),
            Some(MenuDate::On(ymd(2025, 9, 16)))
        );
        assert_eq!(
            parse_date_text("16th Sep", today, DateRollover::KeepPast),
            Some(MenuDate::On(ymd(2024, 9, 16)))
        );
        // Today itself is not in the past
        assert_eq!(
            parse_date_text("1st Oct", today, DateRollover::NextYear),
            Some(MenuDate::On(ymd(2024, 10, 1)))
        );
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(from_serial(45551.0), Some(ymd(2024, 9, 16)));
        assert_eq!(from_serial(45551.75), Some(ymd(2024, 9, 16)));
        assert_eq!(from_serial(-3.0), None);
        assert_eq!(from_serial(f64::NAN), None);
    }

    #[test]
    fn test_serials_before_march_1900() {
        assert_eq!(from_serial(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(from_serial(59.0), Some(ymd(1900, 2, 28)));
        assert_eq!(from_serial(60.0), None);
        assert_eq!(from_serial(61.0), Some(ymd(1900, 3, 1)));
    }

    #[test]
    fn test_leap_day_rolls_to_next_leap_year() {
        for today in [ymd(2024, 3, 1), ymd(2025, 3, 1)] {
            assert_eq!(
                parse_date_text("29th Feb", today, DateRollover::NextYear),
                Some(MenuDate::On(ymd(2028, 2, 29))),
                "{today}"
            );
        }
        assert_eq!(
            parse_date_text("29th Feb", ymd(2024, 1, 10), DateRollover::NextYear),
            Some(MenuDate::On(ymd(2024, 2, 29)))
        );
        assert_eq!(
            parse_date_text("29th Feb", ymd(2025, 3, 1), DateRollover::KeepPast),
            None
        );
        assert_eq!(
            parse_date_text("31st Feb", ymd(2025, 3, 1), DateRollover::NextYear),
            None
        );
    }

    #[test]
    fn test_canonical_form() {
        for date in [
            MenuDate::Daily,
            MenuDate::Weekly(Weekday::Wed),
            MenuDate::On(ymd(2024, 9, 16)),
        ] {
            assert_eq!(date.to_string().parse::<MenuDate>(), Ok(date));
        }
        assert_eq!(MenuDate::Weekly(Weekday::Wed).to_string(), "Weekly-Wednesday");
    }
}
