//! # Award Floor
//!
//! Points-floor scanner for award tickets out of a single hub airport.
//!
//! For every configured (hub, remote) route and for each direction, the
//! scanner finds the cheapest points price at or below the route's cap across
//! a multi-month window, then lists exactly which days of each month are
//! priced at that floor. The per-route results are merged into one CSV report.
//!
//! ## Architecture
//!
//! - [`models`]: Airports, routes, months, fares and the values the passes derive
//! - [`fetcher`]: The [`PageFetcher`](fetcher::PageFetcher) capability and its
//!   in-memory, on-disk and throttling implementations
//! - [`services`]: Floor resolution (Pass 1), date selection (Pass 2),
//!   aggregation, report assembly and the scan runner
//! - [`config`]: TOML configuration and validation into a [`ScanPlan`](config::ScanPlan)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use award_floor::config::ScanPlan;
//! use award_floor::fetcher::LocalFetcher;
//! use award_floor::models::{Direction, MonthWindow, Points, Route, RouteConfig};
//! use award_floor::services::{run_scan, ScanTracker};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let hub = "PHX".parse().unwrap();
//! let route = Route::new(hub, "SEA".parse().unwrap());
//! let window = MonthWindow::consecutive("2027-01".parse().unwrap(), 2).unwrap();
//!
//! let fetcher = LocalFetcher::new();
//! fetcher.insert_days(route, Direction::Outbound, window.first(), [(3, Points::new(5000), None)]);
//!
//! let plan = ScanPlan::new(hub, vec![RouteConfig::new(route, Points::new(15000))], window);
//! let outcome = run_scan(Arc::new(fetcher), &plan, &ScanTracker::new()).await;
//!
//! assert_eq!(outcome.report.rows.len(), 1);
//! assert_eq!(outcome.summaries[0].outbound.dates_for(plan.window().first()), "3");
//! # }
//! ```

// FetchError carries a full page context on every variant
#![allow(clippy::result_large_err)]

pub mod config;
pub mod fetcher;
pub mod models;
pub mod services;
