//! Scan configuration: TOML file loading, environment overrides and validation.

pub mod error;
pub mod scan_config;

pub use error::ConfigError;
pub use scan_config::{
    AirportSettings, FetcherPlan, FetcherSettings, OutputSettings, ScanConfig, ScanPlan,
    WindowSettings,
};
