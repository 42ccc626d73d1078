//! Page fetcher factory.
//!
//! Builds the configured fetcher and wraps it in the shared fetch limiter.

use std::str::FromStr;
use std::sync::Arc;

use super::local::LocalFetcher;
use super::page::PageFetcher;
use super::snapshot::SnapshotFetcher;
use super::throttle::ThrottledFetcher;
use crate::config::{ConfigError, FetcherPlan};

/// Page fetcher type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherType {
    /// In-memory fetcher, populated by the caller
    Local,
    /// Captured calendar pages on disk
    Snapshot,
}

impl FromStr for FetcherType {
    type Err = String;

    /// Parse fetcher type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("local", "snapshot")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "snapshot" | "snapshots" => Ok(Self::Snapshot),
            _ => Err(format!("Unknown fetcher type: {}", s)),
        }
    }
}

/// Factory for page fetcher instances.
pub struct FetcherFactory;

impl FetcherFactory {
    /// Create the fetcher described by `plan`, throttled to its concurrency
    /// limit and pause.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn PageFetcher>)` - Throttled fetcher instance
    /// * `Err(ConfigError)` - If the snapshot directory is missing
    pub fn create(plan: &FetcherPlan) -> Result<Arc<dyn PageFetcher>, ConfigError> {
        let inner: Arc<dyn PageFetcher> = match plan.fetcher_type {
            FetcherType::Local => Self::create_local(),
            FetcherType::Snapshot => {
                let dir = plan
                    .snapshot_dir
                    .as_ref()
                    .ok_or(ConfigError::MissingSnapshotDir)?;
                if !dir.is_dir() {
                    return Err(ConfigError::SnapshotDirNotFound(dir.display().to_string()));
                }
                Arc::new(SnapshotFetcher::new(dir.clone()))
            }
        };

        Ok(Self::throttle(inner, plan))
    }

    /// Wrap an existing fetcher in the limiter described by `plan`.
    pub fn throttle(inner: Arc<dyn PageFetcher>, plan: &FetcherPlan) -> Arc<dyn PageFetcher> {
        Arc::new(ThrottledFetcher::new(
            inner,
            plan.max_concurrent_fetches,
            plan.pause,
        ))
    }

    /// Create an empty in-memory fetcher.
    pub fn create_local() -> Arc<dyn PageFetcher> {
        Arc::new(LocalFetcher::new())
    }
}
