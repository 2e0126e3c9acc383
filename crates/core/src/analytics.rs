//! Reporting periods, growth percentages and other dashboard math.

use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum number of days returned by the daily breakdown.
pub const MAX_DAILY_DAYS: i64 = 30;

/// Default number of rows for the top-N reports.
pub const DEFAULT_TOP_LIMIT: i64 = 5;
pub const MAX_TOP_LIMIT: i64 = 50;

/// Window of the per-user and per-card scan histograms.
pub const SCAN_HISTORY_DAYS: i64 = 30;

/// Reporting window accepted by the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Days7,
    #[default]
    Days30,
    Days90,
    Year,
    All,
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::Days7),
            "30d" => Ok(Period::Days30),
            "90d" => Ok(Period::Days90),
            "1y" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(CoreError::Validation(format!(
                "Invalid period '{other}'. Must be one of: 7d, 30d, 90d, 1y, all"
            ))),
        }
    }
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Days7 => "7d",
            Period::Days30 => "30d",
            Period::Days90 => "90d",
            Period::Year => "1y",
            Period::All => "all",
        }
    }

    /// Start of the window ending at `now`. `All` starts at the Unix epoch.
    pub fn start(self, now: Timestamp) -> Timestamp {
        match self {
            Period::Days7 => now - Duration::days(7),
            Period::Days30 => now - Duration::days(30),
            Period::Days90 => now - Duration::days(90),
            Period::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            Period::All => DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// The window of the same length immediately before this one, as
    /// `(previous_start, current_start)`.
    pub fn previous_window(self, now: Timestamp) -> (Timestamp, Timestamp) {
        let start = self.start(now);
        let length = now - start;
        (start - length, start)
    }

    /// Number of days covered by the daily breakdown, capped at
    /// [`MAX_DAILY_DAYS`]. `oldest` is the first record date, used for `All`.
    pub fn daily_days(self, now: Timestamp, oldest: Option<Timestamp>) -> i64 {
        let days = match self {
            Period::Days7 => 7,
            Period::Days30 => 30,
            Period::Days90 => 90,
            Period::Year => 365,
            Period::All => oldest
                .map(|o| (now - o).num_days() + 1)
                .unwrap_or(MAX_DAILY_DAYS),
        };
        days.clamp(1, MAX_DAILY_DAYS)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage change between two periods, rounded to one decimal.
///
/// A previous value of zero yields `100.0` when the current value is positive
/// and `0.0` otherwise.
pub fn growth(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round1((current - previous) / previous * 100.0)
}

/// `part / total * 100`, rounded to one decimal. A zero total yields `0.0`.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// Display name and flag for the countries most scans come from. Unknown codes
/// fall back to the code itself and a globe.
pub fn country_display(code: &str) -> (String, &'static str) {
    let known = match code.to_uppercase().as_str() {
        "FR" => Some(("France", "🇫🇷")),
        "BE" => Some(("Belgium", "🇧🇪")),
        "CH" => Some(("Switzerland", "🇨🇭")),
        "CA" => Some(("Canada", "🇨🇦")),
        "US" => Some(("USA", "🇺🇸")),
        "GB" => Some(("UK", "🇬🇧")),
        "DE" => Some(("Germany", "🇩🇪")),
        "ES" => Some(("Spain", "🇪🇸")),
        "IT" => Some(("Italy", "🇮🇹")),
        _ => None,
    };
    match known {
        Some((name, flag)) => (name.to_string(), flag),
        None => (code.to_string(), "🌍"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_all_periods() {
        for p in ["7d", "30d", "90d", "1y", "all"] {
            let parsed: Period = p.parse().unwrap();
            assert_eq!(parsed.as_str(), p);
        }
        assert_matches!("2w".parse::<Period>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn default_period_is_thirty_days() {
        assert_eq!(Period::default(), Period::Days30);
    }

    #[test]
    fn previous_window_has_same_length() {
        let (prev_start, start) = Period::Days7.previous_window(now());
        assert_eq!(start, now() - Duration::days(7));
        assert_eq!(prev_start, now() - Duration::days(14));
    }

    #[test]
    fn year_period_uses_calendar_months() {
        assert_eq!(
            Period::Year.start(now()),
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn growth_handles_zero_previous() {
        assert_eq!(growth(5.0, 0.0), 100.0);
        assert_eq!(growth(0.0, 0.0), 0.0);
    }

    #[test]
    fn growth_rounds_to_one_decimal() {
        assert_eq!(growth(4.0, 3.0), 33.3);
        assert_eq!(growth(1.0, 4.0), -75.0);
    }

    #[test]
    fn daily_days_are_capped() {
        assert_eq!(Period::Days7.daily_days(now(), None), 7);
        assert_eq!(Period::Year.daily_days(now(), None), 30);
        let oldest = now() - Duration::days(3);
        assert_eq!(Period::All.daily_days(now(), Some(oldest)), 4);
    }

    #[test]
    fn percentage_of_zero_total() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.3);
    }

    #[test]
    fn unknown_country_falls_back_to_code() {
        assert_eq!(country_display("fr"), ("France".to_string(), "🇫🇷"));
        assert_eq!(country_display("JP"), ("JP".to_string(), "🌍"));
    }
}
