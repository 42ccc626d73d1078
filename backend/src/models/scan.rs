//! Values derived by the two scan passes and the per-route summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::fare::{Direction, Points, TaxAmount};
use super::route::Route;
use super::window::{MonthWindow, YearMonth};

/// Pass 1 output: the lowest points price at or below the cap across the whole window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorResult {
    pub route: Route,
    pub direction: Direction,
    /// `None` when nothing in the window was priced at or below the cap.
    pub floor: Option<Points>,
}

impl FloorResult {
    pub fn is_available(&self) -> bool {
        self.floor.is_some()
    }
}

/// Pass 2 output for one month: the days priced exactly at the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailability {
    pub route: Route,
    pub direction: Direction,
    pub month: YearMonth,
    pub days: BTreeSet<u8>,
}

impl MonthAvailability {
    pub fn empty(route: Route, direction: Direction, month: YearMonth) -> Self {
        Self {
            route,
            direction,
            month,
            days: BTreeSet::new(),
        }
    }
}

/// Both passes for one (route, direction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionScan {
    pub floor: FloorResult,
    /// One entry per window month, in window order.
    pub months: Vec<MonthAvailability>,
    /// Taxes seen on floor-priced days, in scan order.
    pub floor_taxes: Vec<TaxAmount>,
}

/// Report-ready view of one direction of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSummary {
    pub points: Option<Points>,
    pub tax: Option<TaxAmount>,
    /// Compressed date string per window month, in window order.
    pub dates: Vec<(YearMonth, String)>,
}

impl DirectionSummary {
    /// No inventory: blank points, tax and dates for every window month.
    pub fn blank(window: &MonthWindow) -> Self {
        Self {
            points: None,
            tax: None,
            dates: window.iter().map(|month| (month, String::new())).collect(),
        }
    }

    /// Dates cell for `month`, blank when the month was never scanned.
    pub fn dates_for(&self, month: YearMonth) -> &str {
        self.dates
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, dates)| dates.as_str())
            .unwrap_or("")
    }

    pub fn has_inventory(&self) -> bool {
        self.points.is_some()
    }
}

/// One report row: both directions of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub route: Route,
    pub outbound: DirectionSummary,
    pub inbound: DirectionSummary,
}

impl RouteSummary {
    /// Row for a route whose scan produced nothing usable.
    pub fn blank(route: Route, window: &MonthWindow) -> Self {
        Self {
            route,
            outbound: DirectionSummary::blank(window),
            inbound: DirectionSummary::blank(window),
        }
    }

    pub fn direction(&self, direction: Direction) -> &DirectionSummary {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Return => &self.inbound,
        }
    }
}
