//! Run-wide record of what a scan recovered from.
//!
//! Fetch failures never abort a scan; they blank the affected month instead.
//! The tracker keeps a timestamped entry for each of them and the status of
//! every route task, so a finished run can say exactly what is missing and why.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::fetcher::FetchError;
use crate::models::{Direction, Route, YearMonth};

/// Which of the two scan passes issued a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPass {
    /// Pass 1: floor resolution.
    Floor,
    /// Pass 2: date selection.
    Dates,
}

impl ScanPass {
    /// Operation name attached to fetch errors raised during this pass.
    pub fn operation(&self) -> &'static str {
        match self {
            ScanPass::Floor => "resolve_floor",
            ScanPass::Dates => "select_dates",
        }
    }
}

impl fmt::Display for ScanPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPass::Floor => f.write_str("floor"),
            ScanPass::Dates => f.write_str("dates"),
        }
    }
}

/// One recovered fetch failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchIssue {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub pass: ScanPass,
    pub route: Route,
    pub direction: Direction,
    pub month: YearMonth,
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

/// Route task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Running,
    Completed,
    /// The route task died; its row is reported blank.
    Failed,
}

/// Counts for the end-of-run log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub routes_total: usize,
    pub routes_completed: usize,
    pub routes_failed: usize,
    pub fetch_issues: usize,
}

#[derive(Default)]
struct TrackerState {
    issues: Vec<FetchIssue>,
    routes: HashMap<Route, RouteStatus>,
}

/// In-memory scan tracker, shared by every route task.
#[derive(Clone, Default)]
pub struct ScanTracker {
    state: Arc<RwLock<TrackerState>>,
}

impl ScanTracker {
    /// Create a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetch failure that was recovered as an empty month.
    pub fn record_issue(
        &self,
        pass: ScanPass,
        route: Route,
        direction: Direction,
        month: YearMonth,
        error: &FetchError,
    ) {
        let issue = FetchIssue {
            timestamp: chrono::Utc::now(),
            pass,
            route,
            direction,
            month,
            kind: error.kind().to_string(),
            message: error.to_string(),
            retryable: error.is_retryable(),
        };
        self.state.write().issues.push(issue);
    }

    pub fn route_started(&self, route: Route) {
        self.state.write().routes.insert(route, RouteStatus::Running);
    }

    pub fn route_completed(&self, route: Route) {
        self.state.write().routes.insert(route, RouteStatus::Completed);
    }

    pub fn route_failed(&self, route: Route) {
        self.state.write().routes.insert(route, RouteStatus::Failed);
    }

    pub fn route_status(&self, route: Route) -> Option<RouteStatus> {
        self.state.read().routes.get(&route).copied()
    }

    /// All recorded issues, oldest first.
    pub fn issues(&self) -> Vec<FetchIssue> {
        self.state.read().issues.clone()
    }

    pub fn issues_for(&self, route: Route) -> Vec<FetchIssue> {
        self.state
            .read()
            .issues
            .iter()
            .filter(|issue| issue.route == route)
            .cloned()
            .collect()
    }

    pub fn issue_count(&self) -> usize {
        self.state.read().issues.len()
    }

    pub fn summary(&self) -> ScanSummary {
        let state = self.state.read();
        let count = |status: RouteStatus| state.routes.values().filter(|s| **s == status).count();
        ScanSummary {
            routes_total: state.routes.len(),
            routes_completed: count(RouteStatus::Completed),
            routes_failed: count(RouteStatus::Failed),
            fetch_issues: state.issues.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::ErrorContext;

    fn route(remote: &str) -> Route {
        Route::new("PHX".parse().unwrap(), remote.parse().unwrap())
    }

    #[test]
    fn test_record_issue() {
        let tracker = ScanTracker::new();
        let month: YearMonth = "2026-04".parse().unwrap();
        let error = FetchError::page_load_with_context(
            "timeout waiting for calendar",
            ErrorContext::new("fetch").for_page(route("SEA"), Direction::Return, month),
        );

        tracker.record_issue(ScanPass::Floor, route("SEA"), Direction::Return, month, &error);

        let issues = tracker.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pass, ScanPass::Floor);
        assert_eq!(issues[0].kind, "page_load");
        assert!(issues[0].retryable);
        assert!(issues[0].message.contains("timeout waiting for calendar"));
        assert_eq!(tracker.issues_for(route("SEA")).len(), 1);
        assert!(tracker.issues_for(route("DEN")).is_empty());
    }

    #[test]
    fn test_route_status_and_summary() {
        let tracker = ScanTracker::new();
        tracker.route_started(route("SEA"));
        tracker.route_started(route("DEN"));
        tracker.route_started(route("LAX"));
        tracker.route_completed(route("SEA"));
        tracker.route_failed(route("DEN"));

        assert_eq!(tracker.route_status(route("SEA")), Some(RouteStatus::Completed));
        assert_eq!(tracker.route_status(route("LAX")), Some(RouteStatus::Running));
        assert_eq!(tracker.route_status(route("BOI")), None);

        let summary = tracker.summary();
        assert_eq!(summary.routes_total, 3);
        assert_eq!(summary.routes_completed, 1);
        assert_eq!(summary.routes_failed, 1);
        assert_eq!(summary.fetch_issues, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = ScanTracker::new();
        let other = tracker.clone();
        other.route_started(route("SEA"));
        assert_eq!(tracker.summary().routes_total, 1);
    }
}
