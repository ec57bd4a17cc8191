//! Approximate natural-language rendering of a duration given in minutes.
//!
//! Thresholds follow the conventional relative-time buckets: "a few seconds",
//! "a minute", "N minutes", "an hour", ... "N years". Each unit is rounded to
//! the nearest whole value before the bucket is chosen.

const DAYS_PER_MONTH: f64 = 30.436875;
const DAYS_PER_YEAR: f64 = 365.2425;

/// Text used for a metric that has no defined value.
pub const UNDEFINED: &str = "n/a";

pub fn humanize(minutes: f64) -> String {
    if !minutes.is_finite() {
        return UNDEFINED.to_string();
    }

    let minutes_abs = minutes.abs();
    let seconds = (minutes_abs * 60.0).round();
    let mins = minutes_abs.round();
    let hours = (minutes_abs / 60.0).round();
    let days_exact = minutes_abs / (60.0 * 24.0);
    let days = days_exact.round();
    let months = (days_exact / DAYS_PER_MONTH).round();
    let years = (days_exact / DAYS_PER_YEAR).round();

    if seconds <= 44.0 {
        "a few seconds".to_string()
    } else if mins <= 1.0 {
        "a minute".to_string()
    } else if mins < 45.0 {
        format!("{} minutes", mins)
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours)
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days)
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{} months", months)
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    }
}

pub fn humanize_opt(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) => humanize(m),
        None => UNDEFINED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_durations() {
        assert_eq!(humanize(0.0), "a few seconds");
        assert_eq!(humanize(0.5), "a few seconds");
        assert_eq!(humanize(1.0), "a minute");
        assert_eq!(humanize(1.4), "a minute");
        assert_eq!(humanize(12.0), "12 minutes");
    }

    #[test]
    fn test_hour_and_day_buckets() {
        assert_eq!(humanize(44.0), "44 minutes");
        assert_eq!(humanize(45.0), "an hour");
        assert_eq!(humanize(120.0), "2 hours");
        assert_eq!(humanize(21.0 * 60.0), "21 hours");
        assert_eq!(humanize(22.0 * 60.0), "a day");
        assert_eq!(humanize(3.0 * 24.0 * 60.0), "3 days");
    }

    #[test]
    fn test_month_and_year_buckets() {
        let day = 24.0 * 60.0;
        assert_eq!(humanize(26.0 * day), "a month");
        assert_eq!(humanize(95.0 * day), "3 months");
        assert_eq!(humanize(340.0 * day), "a year");
        assert_eq!(humanize(800.0 * day), "2 years");
    }

    #[test]
    fn test_negative_uses_magnitude() {
        assert_eq!(humanize(-120.0), "2 hours");
    }

    #[test]
    fn test_undefined() {
        assert_eq!(humanize(f64::NAN), UNDEFINED);
        assert_eq!(humanize(f64::INFINITY), UNDEFINED);
        assert_eq!(humanize_opt(None), UNDEFINED);
    }
}
