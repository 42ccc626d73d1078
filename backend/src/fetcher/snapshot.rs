//! Page fetcher over captured calendar pages on disk.
//!
//! Layout: `<root>/<ORIGIN>-<DEST>/<YYYY-MM>.json`, each file holding the
//! rendered text of the calendar cells:
//!
//! ```json
//! { "cells": ["1\n4.5k +$19", "2\n7.5k +$19"] }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::calendar::cells_to_observations;
use super::error::{ErrorContext, FetchError, FetchResult};
use super::page::PageFetcher;
use crate::models::{Direction, Observation, Route, YearMonth};

/// Contents of one captured calendar page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    #[serde(default)]
    pub cells: Vec<String>,
}

/// Reads calendar snapshots from a directory tree.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    root: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the snapshot for one calendar page.
    pub fn page_path(&self, route: Route, direction: Direction, month: YearMonth) -> PathBuf {
        self.root
            .join(format!(
                "{}-{}",
                route.origin(direction),
                route.destination(direction)
            ))
            .join(format!("{}.json", month))
    }

    /// Write a snapshot where [`fetch`](PageFetcher::fetch) will look for it.
    pub fn write_page(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
        snapshot: &CalendarSnapshot,
    ) -> std::io::Result<PathBuf> {
        let path = self.page_path(route, direction, month);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

#[async_trait]
impl PageFetcher for SnapshotFetcher {
    async fn fetch(
        &self,
        route: Route,
        direction: Direction,
        month: YearMonth,
    ) -> FetchResult<Vec<Observation>> {
        let path = self.page_path(route, direction, month);
        let context = || {
            ErrorContext::new("read_snapshot")
                .for_page(route, direction, month)
                .with_details(path.display().to_string())
        };

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::not_found_with_context(
                    "No calendar snapshot for page",
                    context(),
                ));
            }
            Err(e) => {
                return Err(FetchError::page_load_with_context(
                    format!("Failed to read snapshot: {}", e),
                    context(),
                ));
            }
        };

        let snapshot: CalendarSnapshot = serde_json::from_str(&content).map_err(|e| {
            FetchError::parse_with_context(format!("Malformed snapshot: {}", e), context())
        })?;

        Ok(cells_to_observations(route, direction, month, &snapshot.cells))
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}
