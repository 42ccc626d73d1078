//! Calendar page fetching.
//!
//! A page is one (origin, destination, month) calendar. The [`PageFetcher`]
//! trait is the only way the scan reaches the outside world; every
//! implementation returns the day cells it saw as [`Observation`]s.
//!
//! [`Observation`]: crate::models::Observation

pub mod calendar;
pub mod error;
pub mod factory;
pub mod local;
pub mod page;
pub mod snapshot;
pub mod throttle;

pub use calendar::{cells_to_observations, parse_cell, CalendarCell};
pub use error::{ErrorContext, FetchError, FetchResult};
pub use factory::{FetcherFactory, FetcherType};
pub use local::LocalFetcher;
pub use page::PageFetcher;
pub use snapshot::{CalendarSnapshot, SnapshotFetcher};
pub use throttle::ThrottledFetcher;
