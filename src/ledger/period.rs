use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Aggregation scope selected by a period tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SummaryPeriod {
    /// The seven days up to and including `now`.
    Weekly,
    /// The calendar month of `now`.
    #[default]
    Monthly,
    /// Every record regardless of date.
    All,
    /// Any other tag. Matches nothing.
    Unrecognized(String),
}

impl SummaryPeriod {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "weekly" => SummaryPeriod::Weekly,
            "monthly" => SummaryPeriod::Monthly,
            "all" => SummaryPeriod::All,
            _ => SummaryPeriod::Unrecognized(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            SummaryPeriod::Weekly => "weekly",
            SummaryPeriod::Monthly => "monthly",
            SummaryPeriod::All => "all",
            SummaryPeriod::Unrecognized(tag) => tag,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SummaryPeriod::Weekly => "Last 7 days".into(),
            SummaryPeriod::Monthly => "This month".into(),
            SummaryPeriod::All => "All time".into(),
            SummaryPeriod::Unrecognized(tag) => format!("Unknown period `{tag}`"),
        }
    }

    pub fn contains(&self, date: NaiveDate, now: NaiveDate) -> bool {
        match self {
            SummaryPeriod::Weekly => {
                let age = now.signed_duration_since(date).num_days();
                (0..=WEEKLY_WINDOW_DAYS).contains(&age)
            }
            SummaryPeriod::Monthly => date.year() == now.year() && date.month() == now.month(),
            SummaryPeriod::All => true,
            SummaryPeriod::Unrecognized(_) => false,
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for SummaryPeriod {
    fn from(value: String) -> Self {
        SummaryPeriod::from_tag(&value)
    }
}

impl From<SummaryPeriod> for String {
    fn from(value: SummaryPeriod) -> Self {
        value.tag().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_window_is_inclusive_and_excludes_future() {
        let now = date(2024, 1, 10);
        assert!(SummaryPeriod::Weekly.contains(date(2024, 1, 10), now));
        assert!(SummaryPeriod::Weekly.contains(date(2024, 1, 3), now));
        assert!(!SummaryPeriod::Weekly.contains(date(2024, 1, 2), now));
        assert!(!SummaryPeriod::Weekly.contains(date(2024, 1, 11), now));
    }

    #[test]
    fn monthly_compares_year_and_month() {
        let now = date(2024, 1, 15);
        assert!(SummaryPeriod::Monthly.contains(date(2024, 1, 31), now));
        assert!(!SummaryPeriod::Monthly.contains(date(2023, 1, 15), now));
        assert!(!SummaryPeriod::Monthly.contains(date(2024, 2, 1), now));
    }

    #[test]
    fn tags_round_trip_and_unknown_matches_nothing() {
        assert_eq!(SummaryPeriod::from_tag("Weekly"), SummaryPeriod::Weekly);
        let unknown = SummaryPeriod::from_tag("yearly");
        assert_eq!(unknown.tag(), "yearly");
        assert!(!unknown.contains(date(2024, 1, 1), date(2024, 1, 1)));
    }
}
