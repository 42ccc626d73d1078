//! Award fare primitives: points, taxes, directions and observations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::route::Route;
use super::window::YearMonth;

/// Award price in loyalty points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(u32);

impl Points {
    pub fn new(points: u32) -> Self {
        Points(points)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Summary-cell form: `5k` for whole thousands, otherwise one decimal (`4.5k`).
    pub fn to_short_string(&self) -> String {
        if self.0 % 1000 == 0 {
            format!("{}k", self.0 / 1000)
        } else {
            format!("{:.1}k", self.0 as f64 / 1000.0)
        }
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cash tax on an award ticket, held in cents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxAmount(u64);

impl TaxAmount {
    pub fn from_cents(cents: u64) -> Self {
        TaxAmount(cents)
    }

    /// Saturates at the largest representable amount.
    pub fn from_dollars(dollars: u64) -> Self {
        TaxAmount(dollars.saturating_mul(100))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

static TAX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?\s*(\d+)(?:\.(\d{1,2}))?$").unwrap());

impl FromStr for TaxAmount {
    type Err = String;

    /// Parse `$19`, `19`, `$5.6` or `$5.60`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cap = TAX_REGEX
            .captures(s.trim())
            .ok_or_else(|| format!("Invalid tax amount '{}'", s))?;
        let out_of_range = || format!("Tax amount out of range '{}'", s);

        let dollars: u64 = cap[1].parse().map_err(|_| out_of_range())?;
        let cents: u64 = match cap.get(2).map(|m| m.as_str()) {
            Some(frac) if frac.len() == 1 => frac.parse::<u64>().map_err(|_| out_of_range())? * 10,
            Some(frac) => frac.parse().map_err(|_| out_of_range())?,
            None => 0,
        };
        dollars
            .checked_mul(100)
            .and_then(|whole| whole.checked_add(cents))
            .map(TaxAmount)
            .ok_or_else(out_of_range)
    }
}

impl TryFrom<String> for TaxAmount {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaxAmount> for String {
    fn from(tax: TaxAmount) -> Self {
        tax.to_string()
    }
}

impl fmt::Display for TaxAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "${}", self.0 / 100)
        } else {
            write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
        }
    }
}

/// Which leg of a route is being priced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Hub to remote airport.
    Outbound,
    /// Remote airport to hub.
    Return,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound"),
            Direction::Return => f.write_str("return"),
        }
    }
}

/// One priced calendar day for one leg of a route.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub route: Route,
    pub direction: Direction,
    pub month: YearMonth,
    pub day: u8,
    pub points: Points,
    /// Absent when the calendar showed no tax for the day.
    pub tax: Option<TaxAmount>,
}

impl Observation {
    /// Build an observation, rejecting days that do not exist in `month`.
    pub fn new(
        route: Route,
        direction: Direction,
        month: YearMonth,
        day: u8,
        points: Points,
        tax: Option<TaxAmount>,
    ) -> Option<Self> {
        if !month.contains_day(day) {
            return None;
        }
        Some(Self {
            route,
            direction,
            month,
            day,
            points,
            tax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_short_string() {
        assert_eq!(Points::new(5000).to_short_string(), "5k");
        assert_eq!(Points::new(4500).to_short_string(), "4.5k");
        assert_eq!(Points::new(7500).to_short_string(), "7.5k");
        assert_eq!(Points::new(20000).to_short_string(), "20k");
        assert_eq!(Points::new(12345).to_short_string(), "12.3k");
    }

    #[test]
    fn test_tax_parse_and_display() {
        assert_eq!("$19".parse::<TaxAmount>().unwrap(), TaxAmount::from_dollars(19));
        assert_eq!("19".parse::<TaxAmount>().unwrap().cents(), 1900);
        assert_eq!("$5.6".parse::<TaxAmount>().unwrap().cents(), 560);
        assert_eq!("$5.60".parse::<TaxAmount>().unwrap().cents(), 560);
        assert_eq!("$ 6".parse::<TaxAmount>().unwrap().cents(), 600);

        assert_eq!(TaxAmount::from_dollars(19).to_string(), "$19");
        assert_eq!(TaxAmount::from_cents(560).to_string(), "$5.60");
        assert_eq!(TaxAmount::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_tax_parse_rejects_garbage() {
        assert!("".parse::<TaxAmount>().is_err());
        assert!("$".parse::<TaxAmount>().is_err());
        assert!("$5.605".parse::<TaxAmount>().is_err());
        assert!("-5".parse::<TaxAmount>().is_err());
        assert!("five".parse::<TaxAmount>().is_err());
    }

    #[test]
    fn test_tax_overflow_is_an_error_not_a_panic() {
        assert!("$200000000000000000".parse::<TaxAmount>().is_err());
        assert!("$99999999999999999999999".parse::<TaxAmount>().is_err());
        assert_eq!(
            "$184467440737095516".parse::<TaxAmount>().unwrap().cents(),
            18_446_744_073_709_551_600
        );
        assert_eq!(TaxAmount::from_dollars(u64::MAX).cents(), u64::MAX);
    }

    #[test]
    fn test_observation_rejects_impossible_day() {
        let route = Route::new("PHX".parse().unwrap(), "SEA".parse().unwrap());
        let feb: YearMonth = "2026-02".parse().unwrap();

        assert!(Observation::new(route, Direction::Outbound, feb, 28, Points::new(5000), None)
            .is_some());
        assert!(Observation::new(route, Direction::Outbound, feb, 29, Points::new(5000), None)
            .is_none());
        assert!(Observation::new(route, Direction::Outbound, feb, 0, Points::new(5000), None)
            .is_none());
    }
}
