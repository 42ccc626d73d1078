//! The page fetcher capability consumed by the scan passes.

use async_trait::async_trait;

use super::error::FetchResult;
use crate::models::{Direction, Observation, Route, YearMonth};

/// Source of award-calendar observations for one leg of a route and one month.
///
/// An empty result means "no availability" and is not an error. Any failure to
/// load or parse the page is reported as a [`FetchError`](super::FetchError);
/// the caller decides how to recover.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`: routes and directions are fetched
/// from concurrent tasks sharing one fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch every priced day shown on the calendar for `route` in `direction` during `month`.
    async fn fetch(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
    ) -> FetchResult<Vec<Observation>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "page-fetcher"
    }
}
