//! Calendar months and the scan horizon.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// A calendar month (year + month number 1-12).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month, returning `None` for a month number outside 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn first_day(&self) -> NaiveDate {
        // Constructed only through `new`, so the first of the month always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of days in this month (28-31).
    pub fn days_in_month(&self) -> u8 {
        let next = self.succ().first_day();
        next.signed_duration_since(self.first_day()).num_days() as u8
    }

    /// Whether `day` is a valid day-of-month for this month.
    pub fn contains_day(&self, day: u8) -> bool {
        day >= 1 && day <= self.days_in_month()
    }

    /// Column label such as `Mar 2026`.
    pub fn label(&self) -> String {
        let first = self.first_day();
        format!("{} {}", first.format("%b"), first.year())
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month '{}': expected YYYY-MM", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month number in '{}'", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("Month out of range in '{}'", s))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Ordered, non-empty sequence of months making up the scan horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    months: Vec<YearMonth>,
}

impl MonthWindow {
    /// Build a window from strictly ascending months.
    pub fn new(months: Vec<YearMonth>) -> Result<Self, ConfigError> {
        if months.is_empty() {
            return Err(ConfigError::EmptyWindow);
        }
        for pair in months.windows(2) {
            if pair[0] == pair[1] {
                return Err(ConfigError::DuplicateMonth(pair[1].to_string()));
            }
            if pair[0] > pair[1] {
                return Err(ConfigError::UnorderedWindow {
                    previous: pair[0].to_string(),
                    next: pair[1].to_string(),
                });
            }
        }
        Ok(Self { months })
    }

    /// `count` consecutive months beginning at `start`.
    pub fn consecutive(start: YearMonth, count: usize) -> Result<Self, ConfigError> {
        let months = std::iter::successors(Some(start), |m| Some(m.succ()))
            .take(count)
            .collect();
        Self::new(months)
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> YearMonth {
        self.months[0]
    }

    pub fn last(&self) -> YearMonth {
        self.months[self.months.len() - 1]
    }

    pub fn contains(&self, month: YearMonth) -> bool {
        self.months.binary_search(&month).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.months.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let m = ym("2026-03");
        assert_eq!(m.year(), 2026);
        assert_eq!(m.month(), 3);
        assert_eq!(m.to_string(), "2026-03");
        assert_eq!(m.label(), "Mar 2026");
    }

    #[test]
    fn test_parse_rejects_bad_months() {
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("2026".parse::<YearMonth>().is_err());
        assert!("March 2026".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(ym("2026-01").days_in_month(), 31);
        assert_eq!(ym("2026-02").days_in_month(), 28);
        assert_eq!(ym("2028-02").days_in_month(), 29);
        assert_eq!(ym("2026-04").days_in_month(), 30);
        assert_eq!(ym("2026-12").days_in_month(), 31);
        assert!(ym("2026-04").contains_day(30));
        assert!(!ym("2026-04").contains_day(31));
        assert!(!ym("2026-04").contains_day(0));
    }

    #[test]
    fn test_succ_rolls_over_year() {
        assert_eq!(ym("2026-12").succ(), ym("2027-01"));
        assert_eq!(ym("2026-03").succ(), ym("2026-04"));
    }

    #[test]
    fn test_consecutive_window() {
        let window = MonthWindow::consecutive(ym("2026-03"), 11).unwrap();
        assert_eq!(window.len(), 11);
        assert_eq!(window.first(), ym("2026-03"));
        assert_eq!(window.last(), ym("2027-01"));
        assert!(window.contains(ym("2026-12")));
        assert!(!window.contains(ym("2027-02")));
    }

    #[test]
    fn test_window_validation() {
        assert!(matches!(
            MonthWindow::new(vec![]),
            Err(ConfigError::EmptyWindow)
        ));
        assert!(matches!(
            MonthWindow::consecutive(ym("2026-03"), 0),
            Err(ConfigError::EmptyWindow)
        ));
        assert!(matches!(
            MonthWindow::new(vec![ym("2026-03"), ym("2026-03")]),
            Err(ConfigError::DuplicateMonth(_))
        ));
        assert!(matches!(
            MonthWindow::new(vec![ym("2026-04"), ym("2026-03")]),
            Err(ConfigError::UnorderedWindow { .. })
        ));
    }
}
