//! 5-field cron expressions (minute hour day month weekday)
//!
//! The automation stores schedules in the classic 5-field form. The trigger
//! backend wants seconds first, so [`CronSchedule::to_six_field`] prefixes
//! `0 `. Next-run estimation only understands plain minute/hour values.

use chrono::{DateTime, Duration, TimeZone};
use std::fmt;

use crate::errors::ConfigError;

const FIELD_NAMES: [&str; 5] = ["minute", "hour", "day", "month", "dayofweek"];
const FIELD_BOUNDS: [(u32, u32); 5] = [(0, 59), (0, 23), (1, 31), (1, 12), (0, 7)];

/// A validated 5-field cron expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    fields: Vec<String>,
}

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self, ConfigError> {
        let fields: Vec<String> = expression
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if fields.len() != 5 {
            return Err(invalid(format!(
                "expected 5 fields (minute hour day month dayofweek), got {} in '{}'",
                fields.len(),
                expression
            )));
        }

        for (index, field) in fields.iter().enumerate() {
            let (min, max) = FIELD_BOUNDS[index];
            validate_field(field, FIELD_NAMES[index], min, max)?;
        }

        Ok(Self { fields })
    }

    /// Seconds-first form accepted by tokio-cron-scheduler
    pub fn to_six_field(&self) -> String {
        format!("0 {}", self.fields.join(" "))
    }

    pub fn minute(&self) -> Option<u32> {
        self.fields[0].parse().ok()
    }

    pub fn hour(&self) -> Option<u32> {
        self.fields[1].parse().ok()
    }

    /// Today's occurrence of the schedule's minute/hour, or tomorrow's if it
    /// is not strictly after `now`. Day, month and weekday are ignored.
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let (minute, hour) = (self.minute()?, self.hour()?);
        let timezone = now.timezone();
        let today = now.date_naive();

        let today_run = timezone
            .from_local_datetime(&today.and_hms_opt(hour, minute, 0)?)
            .earliest()?;
        if today_run > *now {
            return Some(today_run);
        }

        let tomorrow = today + Duration::days(1);
        timezone
            .from_local_datetime(&tomorrow.and_hms_opt(hour, minute, 0)?)
            .earliest()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(" "))
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: "schedule".to_string(),
        reason,
    }
}

fn validate_field(field: &str, name: &str, min: u32, max: u32) -> Result<(), ConfigError> {
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (part, None),
        };

        if let Some(step) = step {
            let step = step
                .parse::<u32>()
                .map_err(|_| invalid(format!("invalid {} step value: {}", name, step)))?;
            if step == 0 {
                return Err(invalid(format!("{} step value cannot be 0", name)));
            }
        }

        if base == "*" || base == "?" {
            continue;
        }

        if let Some((start, end)) = base.split_once('-') {
            let start = parse_value(start, name, min, max)?;
            let end = parse_value(end, name, min, max)?;
            if start > end {
                return Err(invalid(format!(
                    "{} range {}-{} is reversed",
                    name, start, end
                )));
            }
            continue;
        }

        parse_value(base, name, min, max)?;
    }

    Ok(())
}

fn parse_value(value: &str, name: &str, min: u32, max: u32) -> Result<u32, ConfigError> {
    let parsed = value
        .parse::<u32>()
        .map_err(|_| invalid(format!("invalid {} value: '{}'", name, value)))?;
    if parsed < min || parsed > max {
        return Err(invalid(format!(
            "{} value {} is outside valid range {}-{}",
            name, parsed, min, max
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2026, 3, 10)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        )
    }

    #[rstest]
    #[case("0 8 * * *")]
    #[case("*/15 * * * *")]
    #[case("30 7 * * 1-5")]
    #[case("0 8,14 1 1-6 0,6")]
    #[case("0 0-23/2 * * *")]
    fn test_accepts_valid_expressions(#[case] expression: &str) {
        assert!(CronSchedule::parse(expression).is_ok(), "{}", expression);
    }

    #[rstest]
    #[case("0 8 * *")]
    #[case("0 0 8 * * *")]
    #[case("60 8 * * *")]
    #[case("0 24 * * *")]
    #[case("0 8 0 * *")]
    #[case("0 8 * 13 *")]
    #[case("*/0 * * * *")]
    #[case("0 10-2 * * *")]
    #[case("abc 8 * * *")]
    fn test_rejects_invalid_expressions(#[case] expression: &str) {
        let err = CronSchedule::parse(expression).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_six_field_form_prefixes_seconds() {
        let schedule = CronSchedule::parse("0  8 * * *").unwrap();
        assert_eq!(schedule.to_six_field(), "0 0 8 * * *");
        assert_eq!(schedule.to_string(), "0 8 * * *");
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow_when_passed() {
        let schedule = CronSchedule::parse("0 8 * * *").unwrap();
        let next = schedule.next_run_after(&at(9, 0)).unwrap();
        assert_eq!(next, at(8, 0) + Duration::days(1));
    }

    #[test]
    fn test_next_run_today_when_still_ahead() {
        let schedule = CronSchedule::parse("0 8 * * *").unwrap();
        let next = schedule.next_run_after(&at(7, 0)).unwrap();
        assert_eq!(next, at(8, 0));
    }

    #[test]
    fn test_next_run_at_exact_time_counts_as_passed() {
        let schedule = CronSchedule::parse("0 8 * * *").unwrap();
        let next = schedule.next_run_after(&at(8, 0)).unwrap();
        assert_eq!(next, at(8, 0) + Duration::days(1));
    }

    #[test]
    fn test_next_run_unknown_for_non_numeric_fields() {
        let schedule = CronSchedule::parse("*/5 * * * *").unwrap();
        assert!(schedule.next_run_after(&at(7, 0)).is_none());
    }

    #[test]
    fn test_next_run_in_named_timezone() {
        let schedule = CronSchedule::parse("30 8 * * *").unwrap();
        let tz = crate::constants::schedule::TIMEZONE;
        let now = tz.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let next = schedule.next_run_after(&now).unwrap();
        assert_eq!(next, tz.with_ymd_and_hms(2026, 3, 11, 8, 30, 0).unwrap());
    }
}
