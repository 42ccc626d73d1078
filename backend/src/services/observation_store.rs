//! Per-page record of what the fetcher returned during one pass.
//!
//! A store is created by the pass that fills it and dropped when that pass
//! has reduced it, so nothing survives from Pass 1 into Pass 2. Each route
//! task owns its own stores; no store is ever shared between tasks.

use futures::future::join_all;
use log::{debug, warn};
use std::collections::BTreeMap;

use super::scan_tracker::{ScanPass, ScanTracker};
use crate::fetcher::{FetchError, PageFetcher};
use crate::models::{Direction, MonthWindow, Observation, Route, YearMonth};

type PageKey = (Route, Direction, YearMonth);

/// Outcome of fetching one calendar page.
#[derive(Debug)]
pub enum PageEntry {
    Fetched(Vec<Observation>),
    /// Recovered failure; the page counts as having no observations.
    Failed(FetchError),
}

impl PageEntry {
    pub fn observations(&self) -> &[Observation] {
        match self {
            PageEntry::Fetched(observations) => observations,
            PageEntry::Failed(_) => &[],
        }
    }
}

/// Observations keyed by (route, direction, month), months in calendar order.
#[derive(Debug, Default)]
pub struct FareObservationStore {
    pages: BTreeMap<PageKey, PageEntry>,
}

impl FareObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched page, replacing any earlier entry for it.
    ///
    /// Observations whose coordinates do not match the page are dropped.
    ///
    /// # Returns
    /// The number of observations kept
    pub fn record_page(
        &mut self,
        route: Route,
        direction: Direction,
        month: YearMonth,
        observations: Vec<Observation>,
    ) -> usize {
        let total = observations.len();
        let kept: Vec<Observation> = observations
            .into_iter()
            .filter(|o| o.route == route && o.direction == direction && o.month == month)
            .collect();
        if kept.len() != total {
            debug!(
                "Dropped {} observations not belonging to {} {} {}",
                total - kept.len(),
                route,
                direction,
                month
            );
        }
        let stored = kept.len();
        self.pages
            .insert((route, direction, month), PageEntry::Fetched(kept));
        stored
    }

    /// Store a failed page.
    pub fn record_failure(
        &mut self,
        route: Route,
        direction: Direction,
        month: YearMonth,
        error: FetchError,
    ) {
        self.pages
            .insert((route, direction, month), PageEntry::Failed(error));
    }

    pub fn entry(&self, route: Route, direction: Direction, month: YearMonth) -> Option<&PageEntry> {
        self.pages.get(&(route, direction, month))
    }

    /// Observations of one page; empty when the page failed or was never fetched.
    pub fn observations(&self, route: Route, direction: Direction, month: YearMonth) -> &[Observation] {
        self.entry(route, direction, month)
            .map(PageEntry::observations)
            .unwrap_or(&[])
    }

    /// Every observation for one (route, direction), month by month.
    pub fn direction_observations(
        &self,
        route: Route,
        direction: Direction,
    ) -> impl Iterator<Item = &Observation> + '_ {
        self.pages
            .iter()
            .filter(move |((r, d, _), _)| *r == route && *d == direction)
            .flat_map(|(_, entry)| entry.observations().iter())
    }

    /// Months whose fetch failed for one (route, direction).
    pub fn failed_months(&self, route: Route, direction: Direction) -> Vec<YearMonth> {
        self.pages
            .iter()
            .filter(|((r, d, _), entry)| {
                *r == route && *d == direction && matches!(entry, PageEntry::Failed(_))
            })
            .map(|((_, _, month), _)| *month)
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Fetch every window month of one (route, direction) into a fresh store.
///
/// Months are requested concurrently; the caller's fetcher decides how many
/// actually run at once. A failed month is logged, recorded on the tracker
/// and stored as [`PageEntry::Failed`]; it never aborts the other months.
pub async fn fetch_window(
    fetcher: &dyn PageFetcher,
    route: Route,
    direction: Direction,
    window: &MonthWindow,
    pass: ScanPass,
    tracker: &ScanTracker,
) -> FareObservationStore {
    let fetches = window.iter().map(|month| async move {
        let result = fetcher.fetch(route, direction, month).await;
        (month, result)
    });
    let results = join_all(fetches).await;

    let mut store = FareObservationStore::new();
    for (month, result) in results {
        match result {
            Ok(observations) => {
                let stored = store.record_page(route, direction, month, observations);
                debug!(
                    "[{}] {} {} {}: {} priced days",
                    pass, route, direction, month, stored
                );
            }
            Err(error) => {
                let error = error
                    .with_page(route, direction, month)
                    .with_operation(pass.operation());
                warn!(
                    "[{}] {} {} {}: fetch failed, month left blank: {}",
                    pass, route, direction, month, error
                );
                tracker.record_issue(pass, route, direction, month, &error);
                store.record_failure(route, direction, month, error);
            }
        }
    }
    store
}
