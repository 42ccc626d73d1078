//! Configuration errors. All of them are fatal and raised before any fetch.

/// Error type for loading and validating a scan configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No scan configuration found: {0}")]
    NotFound(String),

    #[error("Invalid airport code: {0}")]
    InvalidAirportCode(String),

    #[error("Points cap for {code} must be positive, got {cap}")]
    NonPositiveCap { code: String, cap: i64 },

    #[error("Points cap for {code} is too large: {cap}")]
    CapOutOfRange { code: String, cap: i64 },

    #[error("Airport {0} is listed more than once")]
    DuplicateAirport(String),

    #[error("Airport {0} is the hub and cannot also be a remote airport")]
    HubAsRemote(String),

    #[error("No airports configured")]
    NoRoutes,

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Month window is empty")]
    EmptyWindow,

    #[error("Month {0} appears more than once in the window")]
    DuplicateMonth(String),

    #[error("Month window is not in ascending order: {previous} is followed by {next}")]
    UnorderedWindow { previous: String, next: String },

    #[error("Month window must be given either as 'months' or as 'start' + 'count'")]
    AmbiguousWindow,

    #[error("Reserved month {0} is inside the scanned window")]
    ReservedMonthInWindow(String),

    #[error("Unknown fetcher type: {0}")]
    UnknownFetcherType(String),

    #[error("Snapshot fetcher requires 'fetcher.snapshot_dir'")]
    MissingSnapshotDir,

    #[error("Snapshot directory does not exist: {0}")]
    SnapshotDirNotFound(String),

    #[error("'fetcher.max_concurrent_fetches' must be at least 1")]
    ZeroConcurrency,
}
