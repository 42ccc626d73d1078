//! Drives a whole scan: every route, both directions, both passes.
//!
//! Each route runs as its own tokio task and produces an independent
//! [`RouteSummary`]; nothing is shared between routes except the fetcher
//! and the tracker. Within a route the two directions run concurrently, and
//! within a direction Pass 1 always completes before Pass 2 starts.

use futures::future::join_all;
use log::{error, info};
use std::sync::Arc;

use super::date_selector::select_dates;
use super::floor_resolver::resolve_floor;
use super::report::{assemble_report, Report};
use super::route_aggregator::aggregate_route;
use super::scan_tracker::{FetchIssue, ScanSummary, ScanTracker};
use crate::config::ScanPlan;
use crate::fetcher::PageFetcher;
use crate::models::{Direction, DirectionScan, MonthWindow, RouteConfig, RouteSummary};

/// Everything a finished scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// One summary per configured route, in configuration order.
    pub summaries: Vec<RouteSummary>,
    pub report: Report,
    pub issues: Vec<FetchIssue>,
    pub summary: ScanSummary,
}

/// Pass 1 then Pass 2 for one direction of a route.
pub async fn scan_direction(
    fetcher: &dyn PageFetcher,
    config: &RouteConfig,
    direction: Direction,
    window: &MonthWindow,
    tracker: &ScanTracker,
) -> DirectionScan {
    let floor = resolve_floor(fetcher, config, direction, window, tracker).await;
    select_dates(fetcher, &floor, window, tracker).await
}

/// Scan both directions of one route and merge them.
pub async fn scan_route(
    fetcher: &dyn PageFetcher,
    config: &RouteConfig,
    window: &MonthWindow,
    tracker: &ScanTracker,
) -> RouteSummary {
    let (outbound, inbound) = tokio::join!(
        scan_direction(fetcher, config, Direction::Outbound, window, tracker),
        scan_direction(fetcher, config, Direction::Return, window, tracker),
    );
    aggregate_route(config.route, &outbound, &inbound, window)
}

/// Scan every route of `plan` and assemble the report.
///
/// Fetch failures blank the affected months and are listed in the outcome.
/// A route task that dies yields a blank row; the report always has one
/// row per configured route.
pub async fn run_scan(
    fetcher: Arc<dyn PageFetcher>,
    plan: &ScanPlan,
    tracker: &ScanTracker,
) -> ScanOutcome {
    let window = plan.window().clone();
    info!(
        "Scanning {} routes from {} over {} months ({} to {}) with the {} fetcher",
        plan.routes.len(),
        plan.hub(),
        window.len(),
        window.first(),
        window.last(),
        fetcher.name()
    );

    let handles: Vec<_> = plan
        .routes
        .iter()
        .map(|config| {
            let config = *config;
            let fetcher = Arc::clone(&fetcher);
            let window = window.clone();
            let tracker = tracker.clone();
            tracker.route_started(config.route);
            tokio::spawn(async move {
                let summary = scan_route(fetcher.as_ref(), &config, &window, &tracker).await;
                tracker.route_completed(config.route);
                summary
            })
        })
        .collect();

    let results = join_all(handles).await;

    let summaries: Vec<RouteSummary> = plan
        .routes
        .iter()
        .zip(results)
        .map(|(config, result)| match result {
            Ok(summary) => summary,
            Err(e) => {
                error!("{}: route scan aborted, row left blank: {}", config.route, e);
                tracker.route_failed(config.route);
                RouteSummary::blank(config.route, &window)
            }
        })
        .collect();

    let report = assemble_report(&plan.layout, summaries.clone());
    let summary = tracker.summary();
    info!(
        "Scan finished: {}/{} routes completed, {} failed, {} fetch issues",
        summary.routes_completed, summary.routes_total, summary.routes_failed, summary.fetch_issues
    );

    ScanOutcome {
        summaries,
        report,
        issues: tracker.issues(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchResult, LocalFetcher};
    use crate::models::{AirportCode, Observation, Points, Route, YearMonth};
    use crate::services::RouteStatus;
    use async_trait::async_trait;

    fn month(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    /// Delegates to a local fetcher but panics for one remote airport.
    struct PanicsOn {
        remote: AirportCode,
        inner: LocalFetcher,
    }

    #[async_trait]
    impl PageFetcher for PanicsOn {
        async fn fetch(
            &self,
            route: Route,
            direction: Direction,
            month: YearMonth,
        ) -> FetchResult<Vec<Observation>> {
            if route.remote == self.remote {
                panic!("calendar renderer crashed for {}", route);
            }
            self.inner.fetch(route, direction, month).await
        }
    }

    #[tokio::test]
    async fn test_scan_route_runs_both_directions() {
        let fetcher = LocalFetcher::new();
        let route = Route::new("PHX".parse().unwrap(), "BOI".parse().unwrap());
        let window = MonthWindow::consecutive(month("2026-03"), 2).unwrap();
        fetcher.insert_days(
            route,
            Direction::Outbound,
            month("2026-03"),
            [(1, Points::new(5000), None), (2, Points::new(5000), None)],
        );
        fetcher.insert_days(
            route,
            Direction::Return,
            month("2026-04"),
            [(7, Points::new(4500), None)],
        );
        let tracker = ScanTracker::new();

        let summary = scan_route(
            &fetcher,
            &RouteConfig::new(route, Points::new(5000)),
            &window,
            &tracker,
        )
        .await;

        assert_eq!(summary.outbound.points, Some(Points::new(5000)));
        assert_eq!(summary.outbound.dates_for(month("2026-03")), "1-2");
        assert_eq!(summary.inbound.points, Some(Points::new(4500)));
        assert_eq!(summary.inbound.dates_for(month("2026-04")), "7");
        // Two passes, two directions, two months.
        assert_eq!(fetcher.fetch_count(), 8);
    }

    #[tokio::test]
    async fn test_panicked_route_task_yields_blank_row() {
        let hub: AirportCode = "PHX".parse().unwrap();
        let sea = Route::new(hub, "SEA".parse().unwrap());
        let den = Route::new(hub, "DEN".parse().unwrap());
        let window = MonthWindow::consecutive(month("2026-03"), 1).unwrap();

        let inner = LocalFetcher::new();
        inner.insert_days(den, Direction::Outbound, month("2026-03"), [(4, Points::new(5000), None)]);
        inner.insert_days(den, Direction::Return, month("2026-03"), [(9, Points::new(5000), None)]);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(PanicsOn {
            remote: sea.remote,
            inner,
        });

        let plan = ScanPlan::new(
            hub,
            vec![
                RouteConfig::new(sea, Points::new(7500)),
                RouteConfig::new(den, Points::new(7500)),
            ],
            window,
        );
        let tracker = ScanTracker::new();

        let outcome = run_scan(fetcher, &plan, &tracker).await;

        assert_eq!(outcome.report.rows.len(), 2);
        assert_eq!(outcome.report.rows[0][1], "SEA");
        assert!(outcome.report.rows[0][2..].iter().all(|cell| cell.is_empty()));
        assert_eq!(outcome.report.rows[1][1], "DEN");
        assert_eq!(outcome.report.rows[1][3], "9");
        assert_eq!(outcome.report.rows[1][4], "4");
        assert_eq!(outcome.summary.routes_failed, 1);
        assert_eq!(outcome.summary.routes_completed, 1);
        assert_eq!(tracker.route_status(sea), Some(RouteStatus::Failed));
        assert_eq!(tracker.route_status(den), Some(RouteStatus::Completed));
    }
}
