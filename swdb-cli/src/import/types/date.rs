//! Status dates as they appear in workbooks and output files

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Output format of status dates (MM/DD/YYYY)
pub const STATUS_DATE_FORMAT: &str = "%m/%d/%Y";

/// Serial of 9999-12-31, the last date a four-digit year can hold
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Accepts M/D/YY and MM/DD/YYYY
static US_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("valid date regex"));

/// Convert a workbook serial day number to a date
///
/// Serial 1 is 1900-01-01; counting from 1899-12-30 absorbs the phantom
/// 1900-02-29 for every date after February 1900.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..MAX_EXCEL_SERIAL + 1.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}

/// Parse a date written as text in a cell
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Some(caps) = US_DATE.captures(text) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = &caps[3];
        let year: i32 = if year.len() == 2 {
            2000 + year.parse::<i32>().ok()?
        } else {
            year.parse().ok()?
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // ISO date, possibly with a time part
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Serde adapter writing `Option<NaiveDate>` as MM/DD/YYYY
pub mod us_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{STATUS_DATE_FORMAT, parse_date_text};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(STATUS_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_date_text(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid status date '{}'", s))),
        }
    }
}
