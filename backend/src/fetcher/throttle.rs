//! Concurrency cap and pacing for any page fetcher.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::error::{FetchError, FetchResult};
use super::page::PageFetcher;
use crate::models::{Direction, Observation, Route, YearMonth};

/// Wraps a fetcher so that at most `max_concurrent` fetches are in flight,
/// each holding its slot for `pause` after it completes.
pub struct ThrottledFetcher {
    inner: Arc<dyn PageFetcher>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    pause: Duration,
}

impl ThrottledFetcher {
    /// `max_concurrent` is clamped to at least one.
    pub fn new(inner: Arc<dyn PageFetcher>, max_concurrent: usize, pause: Duration) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            pause,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }
}

#[async_trait]
impl PageFetcher for ThrottledFetcher {
    async fn fetch(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
    ) -> FetchResult<Vec<Observation>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FetchError::internal(format!("Fetch limiter closed: {}", e)))?;

        let result = self.inner.fetch(route, direction, month).await;

        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
