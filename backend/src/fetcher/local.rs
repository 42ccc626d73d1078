//! In-memory page fetcher.
//!
//! Serves observations registered up front, suitable for unit testing and
//! local runs. Failures can be injected per page to exercise the recovery
//! paths of the scan passes, and every call is counted.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{ErrorContext, FetchError, FetchResult};
use super::page::PageFetcher;
use crate::models::{AirportCode, Direction, Observation, Points, Route, TaxAmount, YearMonth};

/// Calendar page key: the leg actually flown (origin, destination) and the month.
type PageKey = (AirportCode, AirportCode, YearMonth);

fn page_key(route: Route, direction: Direction, month: YearMonth) -> PageKey {
    (route.origin(direction), route.destination(direction), month)
}

/// In-memory page fetcher.
///
/// # Example
/// ```
/// use award_floor::fetcher::{LocalFetcher, PageFetcher};
/// use award_floor::models::{Direction, Points, Route};
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = LocalFetcher::new();
/// let route = Route::new("PHX".parse().unwrap(), "SEA".parse().unwrap());
/// let jan = "2027-01".parse().unwrap();
///
/// fetcher.insert_days(route, Direction::Outbound, jan, [(3, Points::new(5000), None)]);
///
/// let observations = fetcher.fetch(route, Direction::Outbound, jan).await.unwrap();
/// assert_eq!(observations.len(), 1);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct LocalFetcher {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    pages: HashMap<PageKey, Vec<Observation>>,

    // Injected failures: remaining failure count per page (None = always fail)
    failures: HashMap<PageKey, Option<usize>>,

    // Call accounting
    calls: HashMap<PageKey, usize>,
    total_calls: usize,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
            failures: HashMap::new(),
            calls: HashMap::new(),
            total_calls: 0,
            is_healthy: true,
        }
    }
}

impl LocalFetcher {
    /// Create a new empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register priced days for one calendar page.
    ///
    /// Days that do not exist in `month` are dropped, the same way a rendered
    /// calendar never shows them.
    ///
    /// # Returns
    /// The number of observations stored
    pub fn insert_days<I>(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
        days: I,
    ) -> usize
    where
        I: IntoIterator<Item = (u8, Points, Option<TaxAmount>)>,
    {
        let observations: Vec<Observation> = days
            .into_iter()
            .filter_map(|(day, points, tax)| {
                Observation::new(route, direction, month, day, points, tax)
            })
            .collect();
        let stored = observations.len();

        let mut data = self.data.write();
        data.pages
            .entry(page_key(route, direction, month))
            .or_default()
            .extend(observations);
        stored
    }

    /// Make every fetch of this page fail.
    pub fn fail_page(&self, route: Route, direction: Direction, month: YearMonth) {
        let mut data = self.data.write();
        data.failures
            .insert(page_key(route, direction, month), None);
    }

    /// Make the next `times` fetches of this page fail, then serve it normally.
    pub fn fail_page_times(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
        times: usize,
    ) {
        let mut data = self.data.write();
        data.failures
            .insert(page_key(route, direction, month), Some(times));
    }

    /// Set the health status for testing site-wide outages.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Total number of fetch calls served (including failed ones).
    pub fn fetch_count(&self) -> usize {
        self.data.read().total_calls
    }

    /// Number of fetch calls for one page.
    pub fn fetch_count_for(&self, route: Route, direction: Direction, month: YearMonth) -> usize {
        self.data
            .read()
            .calls
            .get(&page_key(route, direction, month))
            .copied()
            .unwrap_or(0)
    }

    /// Clear all pages, failures and counters.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Consume one injected failure for `key`, if any is pending.
    fn take_failure(data: &mut LocalData, key: &PageKey) -> bool {
        match data.failures.get_mut(key) {
            Some(None) => true,
            Some(Some(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl PageFetcher for LocalFetcher {
    async fn fetch(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
    ) -> FetchResult<Vec<Observation>> {
        let key = page_key(route, direction, month);
        let mut data = self.data.write();
        data.total_calls += 1;
        *data.calls.entry(key).or_insert(0) += 1;

        if !data.is_healthy {
            return Err(FetchError::page_load_with_context(
                "Award calendar site is not reachable",
                ErrorContext::new("fetch").for_page(route, direction, month),
            ));
        }

        if Self::take_failure(&mut data, &key) {
            return Err(FetchError::page_load_with_context(
                "Injected page failure",
                ErrorContext::new("fetch").for_page(route, direction, month),
            ));
        }

        Ok(data.pages.get(&key).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
