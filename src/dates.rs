//! Calendar date helpers.
//!
//! All scheduling works on local calendar dates (`NaiveDate`), serialized as
//! ISO `YYYY-MM-DD`. Nothing in the core reads the wall clock; callers obtain
//! "today" from a [`Clock`] and pass it in.

use chrono::{Days, Local, NaiveDate};

use crate::error::{Error, Result};

pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT).ok()
}

/// Parse a user-supplied date, naming the offending flag on failure.
pub fn parse_iso_arg(label: &str, value: &str) -> Result<NaiveDate> {
    parse_iso(value).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid {label} date '{value}': expected YYYY-MM-DD"
        ))
    })
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// `date` shifted by `days`, or `None` past the representable range.
pub fn checked_add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(step)
    } else {
        date.checked_add_days(step)
    }
}

/// Like [`checked_add_days`], clamped to the supported date range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Short human form, e.g. `Jun 1, 2024`.
pub fn format_short(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Month title, e.g. `June 2024`. `month0` is zero-based.
pub fn format_month(year: i32, month0: u32) -> String {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|first| first.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{:02}", month0 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        parse_iso(value).expect("valid date")
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        assert_eq!(add_days(date("2024-02-01"), 30), date("2024-03-02"));
        assert_eq!(add_days(date("2024-12-30"), 5), date("2025-01-04"));
        assert_eq!(add_days(date("2024-03-01"), -1), date("2024-02-29"));
    }

    #[test]
    fn add_days_clamps_at_range_edges() {
        assert!(checked_add_days(NaiveDate::MAX, 1).is_none());
        assert!(checked_add_days(NaiveDate::MIN, -1).is_none());
        assert_eq!(add_days(date("2024-06-10"), i64::MAX), NaiveDate::MAX);
        assert_eq!(add_days(date("2024-06-10"), i64::MIN), NaiveDate::MIN);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date("2024-06-10"), date("2024-06-15")), 5);
        assert_eq!(days_between(date("2024-06-10"), date("2024-06-01")), -9);
        assert_eq!(days_between(date("2024-06-10"), date("2024-06-10")), 0);
    }

    #[test]
    fn parse_rejects_non_iso() {
        assert!(parse_iso("06/01/2024").is_none());
        assert!(parse_iso("2024-02-30").is_none());
        assert!(parse_iso("").is_none());
        assert_eq!(parse_iso(" 2024-06-01 "), Some(date("2024-06-01")));
    }

    #[test]
    fn parse_iso_arg_names_the_flag() {
        let err = parse_iso_arg("today", "soon").expect_err("invalid");
        assert!(err.to_string().contains("today"));
    }

    #[test]
    fn human_formats() {
        assert_eq!(format_short(date("2024-06-01")), "Jun 1, 2024");
        assert_eq!(format_month(2024, 5), "June 2024");
        assert_eq!(to_iso(date("2024-01-09")), "2024-01-09");
    }

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let clock = FixedClock(date("2024-06-10"));
        assert_eq!(clock.today(), date("2024-06-10"));
    }
}
