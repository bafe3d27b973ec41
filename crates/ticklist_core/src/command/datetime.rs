//! Date/time tokens typed by the user.
//!
//! Accepted forms are `D/M/YYYY` and `D/M/YYYY HHMM` (24-hour, no
//! separator). A date without a time resolves to midnight. This grammar is
//! for input only; stored records use their own fixed pattern.

use super::error::FormatError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid date regex"));
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{2})(\d{2})$").expect("valid date time regex")
});

/// Resolves a `D/M/YYYY[ HHMM]` token.
pub fn parse_date_time(token: &str) -> Result<NaiveDateTime, FormatError> {
    let token = token.trim();
    let invalid = || FormatError::InvalidDateTime(token.to_string());

    if let Some(caps) = DATE_TIME_RE.captures(token) {
        let date = calendar_date(&caps[1], &caps[2], &caps[3]).ok_or_else(invalid)?;
        let time = clock_time(&caps[4], &caps[5]).ok_or_else(invalid)?;
        return Ok(date.and_time(time));
    }
    if let Some(caps) = DATE_RE.captures(token) {
        let date = calendar_date(&caps[1], &caps[2], &caps[3]).ok_or_else(invalid)?;
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(invalid())
}

/// Resolves a `D/M/YYYY` token with no time part.
pub fn parse_date(token: &str) -> Result<NaiveDate, FormatError> {
    let token = token.trim();
    DATE_RE
        .captures(token)
        .and_then(|caps| calendar_date(&caps[1], &caps[2], &caps[3]))
        .ok_or_else(|| FormatError::InvalidDate(token.to_string()))
}

fn calendar_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn clock_time(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
