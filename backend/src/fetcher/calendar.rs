//! Parsing of rendered award-calendar cells.
//!
//! A cell reads like `"1\n4.5k +$19"` or `"9\n20k +$6"`: the day of month,
//! the points price in thousands and, optionally, the cash tax.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Direction, Observation, Points, Route, TaxAmount, YearMonth};

/// A parsed calendar cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: u8,
    pub points: Points,
    pub tax: Option<TaxAmount>,
}

static DAY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})").unwrap());
static POINTS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([\d.]+)k").unwrap());
static TAX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\s*\$(\d+(?:\.\d{1,2})?)").unwrap());

/// Parse one cell.
///
/// Returns `None` for cells without a leading day or without a price, and for
/// cells whose tax does not fit in a [`TaxAmount`].
pub fn parse_cell(text: &str) -> Option<CalendarCell> {
    let text = text.trim();

    let day: u8 = DAY_REGEX.captures(text)?[1].parse().ok()?;

    let thousands: f64 = POINTS_REGEX.captures(text)?[1].parse().ok()?;
    if !thousands.is_finite() {
        return None;
    }
    let points = Points::new((thousands * 1000.0).round() as u32);

    let tax = match TAX_REGEX.captures(text) {
        Some(cap) => Some(cap[1].parse::<TaxAmount>().ok()?),
        None => None,
    };

    Some(CalendarCell { day, points, tax })
}

/// Parse every cell of a calendar page into observations for `month`.
///
/// Cells that do not parse, and days that do not exist in the month, are skipped.
pub fn cells_to_observations<S: AsRef<str>>(
    route: Route,
    direction: Direction,
    month: YearMonth,
    cells: &[S],
) -> Vec<Observation> {
    cells
        .iter()
        .filter_map(|cell| parse_cell(cell.as_ref()))
        .filter_map(|cell| {
            Observation::new(route, direction, month, cell.day, cell.points, cell.tax)
        })
        .collect()
}
