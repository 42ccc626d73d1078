//! Pass 2: which days of each month are priced exactly at the floor.

use log::{debug, info};
use std::collections::BTreeSet;

use super::observation_store::fetch_window;
use super::scan_tracker::{ScanPass, ScanTracker};
use crate::fetcher::PageFetcher;
use crate::models::{
    DirectionScan, FloorResult, MonthAvailability, MonthWindow, Observation, Points, TaxAmount,
};

/// Days priced exactly at `floor`, and the taxes seen on those days in
/// observation order. Days cheaper or dearer than the floor are ignored.
pub fn select_floor_days(observations: &[Observation], floor: Points) -> (BTreeSet<u8>, Vec<TaxAmount>) {
    let mut days = BTreeSet::new();
    let mut taxes = Vec::new();
    for observation in observations.iter().filter(|o| o.points == floor) {
        days.insert(observation.day);
        if let Some(tax) = observation.tax {
            taxes.push(tax);
        }
    }
    (days, taxes)
}

/// Run Pass 2 for one direction of a route.
///
/// An unavailable floor skips the pass entirely: no page is fetched and
/// every month comes back empty. Otherwise every window month is fetched
/// again and reduced to its floor-priced days. Months stay in window order.
pub async fn select_dates(
    fetcher: &dyn PageFetcher,
    floor: &FloorResult,
    window: &MonthWindow,
    tracker: &ScanTracker,
) -> DirectionScan {
    let (route, direction) = (floor.route, floor.direction);

    let Some(points) = floor.floor else {
        debug!("{} {}: no floor, date selection skipped", route, direction);
        return DirectionScan {
            floor: *floor,
            months: window
                .iter()
                .map(|month| MonthAvailability::empty(route, direction, month))
                .collect(),
            floor_taxes: Vec::new(),
        };
    };

    let store = fetch_window(fetcher, route, direction, window, ScanPass::Dates, tracker).await;

    let mut months = Vec::with_capacity(window.len());
    let mut floor_taxes = Vec::new();
    for month in window.iter() {
        let (days, taxes) = select_floor_days(store.observations(route, direction, month), points);
        debug!(
            "{} {} {}: {} days at {} points",
            route,
            direction,
            month,
            days.len(),
            points
        );
        floor_taxes.extend(taxes);
        months.push(MonthAvailability {
            route,
            direction,
            month,
            days,
        });
    }

    let total_days: usize = months.iter().map(|m| m.days.len()).sum();
    info!(
        "{} {}: {} days at the {} points floor",
        route, direction, total_days, points
    );

    DirectionScan {
        floor: *floor,
        months,
        floor_taxes,
    }
}

#[cfg(test)]
#[path = "date_selector_tests.rs"]
mod date_selector_tests;
