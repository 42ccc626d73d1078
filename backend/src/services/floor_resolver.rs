//! Pass 1: the lowest points price at or below the cap across the whole window.

use log::{info, warn};

use super::observation_store::fetch_window;
use super::scan_tracker::{ScanPass, ScanTracker};
use crate::fetcher::PageFetcher;
use crate::models::{Direction, FloorResult, MonthWindow, Observation, Points, RouteConfig};

/// Minimum points among observations priced at or below `cap`.
pub fn min_points_at_or_below_cap<'a, I>(observations: I, cap: Points) -> Option<Points>
where
    I: IntoIterator<Item = &'a Observation>,
{
    observations
        .into_iter()
        .map(|o| o.points)
        .filter(|points| *points <= cap)
        .min()
}

/// Resolve the floor for one direction of a route.
///
/// Every window month is fetched before the floor is decided. The fetched
/// pages are dropped once the minimum is known.
pub async fn resolve_floor(
    fetcher: &dyn PageFetcher,
    config: &RouteConfig,
    direction: Direction,
    window: &MonthWindow,
    tracker: &ScanTracker,
) -> FloorResult {
    let route = config.route;
    let store = fetch_window(fetcher, route, direction, window, ScanPass::Floor, tracker).await;
    let floor = min_points_at_or_below_cap(store.direction_observations(route, direction), config.cap);

    match floor {
        Some(points) => info!(
            "{} {}: floor {} points (cap {})",
            route, direction, points, config.cap
        ),
        None => warn!(
            "{} {}: no award inventory at or below {} points",
            route, direction, config.cap
        ),
    }

    FloorResult {
        route,
        direction,
        floor,
    }
}

#[cfg(test)]
#[path = "floor_resolver_tests.rs"]
mod floor_resolver_tests;
