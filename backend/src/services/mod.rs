//! Scan services: the two passes, aggregation and report assembly.
//!
//! Data flows leaves-first:
//! fetcher -> [`observation_store`] -> [`floor_resolver`] (Pass 1) ->
//! [`date_selector`] (Pass 2) -> [`route_aggregator`] -> [`report`].
//! [`scan_runner`] wires the passes together for a whole configuration.

pub mod date_compressor;
pub mod date_selector;
pub mod floor_resolver;
pub mod observation_store;
pub mod report;
pub mod route_aggregator;
pub mod scan_runner;
pub mod scan_tracker;

pub use date_compressor::{compress_days, expand_days};
pub use date_selector::{select_dates, select_floor_days};
pub use floor_resolver::{min_points_at_or_below_cap, resolve_floor};
pub use observation_store::{fetch_window, FareObservationStore, PageEntry};
pub use report::{assemble_report, Report, ReportError, ReportLayout, RowOrder};
pub use route_aggregator::{aggregate_route, representative_tax, summarize_direction};
pub use scan_runner::{run_scan, scan_direction, scan_route, ScanOutcome};
pub use scan_tracker::{FetchIssue, RouteStatus, ScanPass, ScanSummary, ScanTracker};
