use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};

/// Wire format the API expects for `initial_date`.
pub const INITIAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Truncate to the top of the hour (minutes, seconds and nanoseconds zeroed).
pub fn normalize_to_hour(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Largest `days_from_now` a seed file may use, in either direction.
pub const MAX_DAYS_FROM_NOW: i64 = 36_500;

/// `from + days`, normalized, formatted as `YYYY-MM-DD HH:00:00`.
pub fn initial_date(from: NaiveDateTime, days_from_now: i64) -> Result<String> {
    let start = TimeDelta::try_days(days_from_now)
        .and_then(|delta| from.checked_add_signed(delta))
        .with_context(|| format!("{days_from_now} days from {from} is out of range"))?;
    Ok(normalize_to_hour(start)
        .format(INITIAL_DATE_FORMAT)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_micro_opt(h, min, s, 123_456)
            .unwrap()
    }

    #[test]
    fn test_normalize_to_hour() {
        let dt = at(2024, 3, 14, 15, 9, 26);
        let n = normalize_to_hour(dt);
        assert_eq!(n.hour(), 15);
        assert_eq!(n.minute(), 0);
        assert_eq!(n.second(), 0);
        assert_eq!(n.nanosecond(), 0);
    }

    #[test]
    fn test_initial_date_format() {
        let dt = at(2024, 3, 14, 15, 9, 26);
        assert_eq!(initial_date(dt, 3).unwrap(), "2024-03-17 15:00:00");
    }

    #[test]
    fn test_initial_date_crosses_month() {
        let dt = at(2024, 1, 30, 23, 59, 59);
        assert_eq!(initial_date(dt, 2).unwrap(), "2024-02-01 23:00:00");
    }

    #[test]
    fn test_initial_date_same_day() {
        let dt = at(2024, 12, 31, 0, 0, 1);
        assert_eq!(initial_date(dt, 0).unwrap(), "2024-12-31 00:00:00");
    }

    #[test]
    fn test_initial_date_out_of_range() {
        let dt = at(2024, 3, 14, 15, 9, 26);
        assert!(initial_date(dt, 100_000_000).is_err());
        assert!(initial_date(dt, -100_000_000).is_err());
        assert!(initial_date(dt, i64::MAX).is_err());
        assert!(initial_date(dt, MAX_DAYS_FROM_NOW).is_ok());
    }
}
