//! Date helpers shared by the loader and the filters.
//!
//! Dates travel through polars as `DataType::Date` (days since 1970-01-01). The helpers
//! here detect the textual format used by a column, parse it with `chrono`, and convert
//! between `NaiveDate` and the physical day number.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days from 0001-01-01 (CE) to 1899-12-30, the origin of Excel date serials.
const EXCEL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// Text shapes recognised in date columns, tried in order.
///
/// Slash and dash shapes with the year last are ambiguous between month-first and
/// day-first; `detect_date_format` resolves them by scanning the whole column.
static DATE_SHAPES: LazyLock<[(Regex, DateShape); 4]> = LazyLock::new(|| {
    [
        (shape(r"^\d{4}-\d{1,2}-\d{1,2}$"), DateShape::IsoDash),
        (shape(r"^\d{4}/\d{1,2}/\d{1,2}$"), DateShape::IsoSlash),
        (shape(r"^\d{1,2}/\d{1,2}/\d{4}$"), DateShape::YearLastSlash),
        (shape(r"^\d{1,2}-\d{1,2}-\d{4}$"), DateShape::YearLastDash),
    ]
});

/// Trailing time component: `2016-11-08 00:00:00`, `2016-11-08T13:45`, `11/8/2016 0:00`.
static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    shape(r"^(?P<date>\S+)[ T]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?$")
});

fn shape(pattern: &str) -> Regex {
    // Patterns are literals above; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid date pattern {pattern}: {e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateShape {
    IsoDash,
    IsoSlash,
    YearLastSlash,
    YearLastDash,
}

/// Strips an optional time-of-day suffix, returning only the date part.
pub fn date_part(value: &str) -> &str {
    let value = value.trim();
    TIME_SUFFIX
        .captures(value)
        .and_then(|caps| caps.name("date"))
        .map_or(value, |m| m.as_str())
}

/// Detects the `chrono` format string used by a column of textual dates.
///
/// The shape comes from the first non-empty value. For year-last shapes the column is
/// month-first (US style, as in the Superstore files) unless some value has a first
/// field greater than 12, in which case it is day-first.
///
/// Returns `None` when the first non-empty value has no recognised shape.
pub fn detect_date_format<'a, I>(values: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let first = values
        .clone()
        .into_iter()
        .map(date_part)
        .find(|v| !v.is_empty())?;

    let shape = DATE_SHAPES
        .iter()
        .find(|(regex, _)| regex.is_match(first))
        .map(|(_, shape)| *shape)?;

    let day_first = |separator: char| {
        values.clone().into_iter().map(date_part).any(|v| {
            v.split(separator)
                .next()
                .and_then(|field| field.parse::<u32>().ok())
                .is_some_and(|field| field > 12)
        })
    };

    let format = match shape {
        DateShape::IsoDash => "%Y-%m-%d",
        DateShape::IsoSlash => "%Y/%m/%d",
        DateShape::YearLastSlash if day_first('/') => "%d/%m/%Y",
        DateShape::YearLastSlash => "%m/%d/%Y",
        DateShape::YearLastDash if day_first('-') => "%d-%m-%Y",
        DateShape::YearLastDash => "%m-%d-%Y",
    };

    tracing::debug!("Detected date format '{format}' from sample '{first}'");
    Some(format)
}

/// Parses a single date using a format from `detect_date_format`.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_part(value), format).ok()
}

/// Converts a date to its polars physical representation (days since 1970-01-01).
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of `date_to_days`.
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Converts an Excel date serial (1900 system) to a date, ignoring the time fraction.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = i32::try_from(serial.floor() as i64).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EXCEL_EPOCH_DAYS_FROM_CE)?)
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_temporal`
#[cfg(test)]
mod tests_temporal {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_detect_us_month_first() {
        let values = ["11/8/2016", "6/12/2016", "10/11/2015"];
        assert_eq!(detect_date_format(values), Some("%m/%d/%Y"));
        assert_eq!(parse_date("11/8/2016", "%m/%d/%Y"), Some(ymd(2016, 11, 8)));
    }

    #[test]
    fn test_detect_day_first_when_first_field_exceeds_twelve() {
        let values = ["08-11-2016", "12-06-2016", "13-06-2016"];
        assert_eq!(detect_date_format(values), Some("%d-%m-%Y"));
        assert_eq!(parse_date("13-06-2016", "%d-%m-%Y"), Some(ymd(2016, 6, 13)));
    }

    #[test]
    fn test_detect_iso_with_time_suffix() {
        let values = ["", "2015-01-05 00:00:00", "2015-02-10"];
        assert_eq!(detect_date_format(values), Some("%Y-%m-%d"));
        assert_eq!(
            parse_date("2015-01-05 00:00:00", "%Y-%m-%d"),
            Some(ymd(2015, 1, 5))
        );
        assert_eq!(date_part("2015-01-05T13:45"), "2015-01-05");
    }

    #[test]
    fn test_detect_unknown_shape() {
        assert_eq!(detect_date_format(["Jan 5th, 2015"]), None);
        assert_eq!(detect_date_format(Vec::<&str>::new().iter().copied()), None);
    }

    #[test]
    fn test_unparseable_value_with_valid_shape() {
        assert_eq!(parse_date("2/30/2016", "%m/%d/%Y"), None);
    }

    #[test]
    fn test_days_conversion() {
        assert_eq!(date_to_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_days(ymd(1970, 1, 2)), 1);
        assert_eq!(days_to_date(date_to_days(ymd(2017, 12, 30))), Some(ymd(2017, 12, 30)));
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial_to_date(25569.0), Some(ymd(1970, 1, 1)));
        assert_eq!(excel_serial_to_date(42682.75), Some(ymd(2016, 11, 8)));
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }
}
