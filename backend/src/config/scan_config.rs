//! Scan configuration file support.
//!
//! The scan is configured from a TOML file:
//!
//! ```toml
//! hub = "PHX"
//! row_order = "config"          # or "remote_code"
//!
//! [window]
//! start = "2026-03"
//! count = 11
//! reserved_before = ["2026-02"]
//! reserved_after = ["2027-02"]  # defaults to the month after the window
//!
//! [fetcher]
//! type = "snapshot"             # or "local"
//! snapshot_dir = "snapshots"
//! max_concurrent_fetches = 2
//! pause_ms = 1000
//!
//! [output]
//! path = "awards_PHX.csv"
//!
//! [[airports]]
//! code = "DEN"
//! cap = 4500
//! ```
//!
//! [`ScanConfig`] is the raw, deserialized file. [`ScanConfig::into_plan`]
//! validates it into an immutable [`ScanPlan`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ConfigError;
use crate::fetcher::FetcherType;
use crate::models::{AirportCode, MonthWindow, Points, Route, RouteConfig, YearMonth};
use crate::services::report::{ReportLayout, RowOrder};

/// Scan configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub hub: String,
    #[serde(default)]
    pub row_order: RowOrder,
    pub window: WindowSettings,
    #[serde(default)]
    pub fetcher: FetcherSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub airports: Vec<AirportSettings>,
}

/// Month window settings. Either `months` or `start` + `count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub months: Option<Vec<String>>,
    /// Declared columns before the window that are never scanned.
    #[serde(default)]
    pub reserved_before: Vec<String>,
    /// Declared columns after the window that are never scanned.
    #[serde(default)]
    pub reserved_after: Option<Vec<String>>,
}

/// Page fetcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherSettings {
    #[serde(rename = "type", default = "default_fetcher_type")]
    pub fetcher_type: String,
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    #[serde(default)]
    pub pause_ms: u64,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            fetcher_type: default_fetcher_type(),
            snapshot_dir: None,
            max_concurrent_fetches: default_max_concurrent_fetches(),
            pause_ms: 0,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// One remote airport and its points cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportSettings {
    pub code: String,
    pub cap: i64,
}

fn default_fetcher_type() -> String {
    "local".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    2
}

/// Validated fetcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherPlan {
    pub fetcher_type: FetcherType,
    pub snapshot_dir: Option<PathBuf>,
    pub max_concurrent_fetches: usize,
    pub pause: Duration,
}

impl Default for FetcherPlan {
    fn default() -> Self {
        Self {
            fetcher_type: FetcherType::Local,
            snapshot_dir: None,
            max_concurrent_fetches: default_max_concurrent_fetches(),
            pause: Duration::ZERO,
        }
    }
}

/// A validated, immutable scan configuration.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub routes: Vec<RouteConfig>,
    pub layout: ReportLayout,
    pub fetcher: FetcherPlan,
    pub output_path: PathBuf,
}

impl ScanPlan {
    /// Plan with the default report layout, in-memory fetcher and output path.
    pub fn new(hub: AirportCode, routes: Vec<RouteConfig>, window: MonthWindow) -> Self {
        Self {
            routes,
            layout: ReportLayout::new(hub, window),
            fetcher: FetcherPlan::default(),
            output_path: default_output_path(hub),
        }
    }

    pub fn hub(&self) -> AirportCode {
        self.layout.hub
    }

    pub fn window(&self) -> &MonthWindow {
        &self.layout.window
    }
}

fn default_output_path(hub: AirportCode) -> PathBuf {
    PathBuf::from(format!("awards_{}.csv", hub))
}

fn parse_month(value: &str) -> Result<YearMonth, ConfigError> {
    value.parse().map_err(ConfigError::InvalidMonth)
}

fn parse_months(values: &[String]) -> Result<Vec<YearMonth>, ConfigError> {
    values.iter().map(|v| parse_month(v)).collect()
}

impl ScanConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a scan configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ScanConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the scan configuration from the default location.
    ///
    /// Searches for `scan.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("scan.toml"),
            PathBuf::from("backend/scan.toml"),
            PathBuf::from("../scan.toml"),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ConfigError::NotFound(
            "No scan.toml found in standard locations".to_string(),
        ))
    }

    /// Load from `AWARD_SCAN_CONFIG` when set, otherwise from the default
    /// location, then apply environment overrides.
    ///
    /// # Environment Variables
    /// - `AWARD_SCAN_CONFIG` (optional): path to the TOML file
    /// - `AWARD_SCAN_OUTPUT` (optional): report output path
    /// - `FETCHER_TYPE` (optional): `local` | `snapshot`
    /// - `SNAPSHOT_DIR` (optional): snapshot directory for the snapshot fetcher
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`ScanConfig::load`], but an explicit `path` takes precedence over
    /// `AWARD_SCAN_CONFIG`. Overrides are applied exactly once.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match env::var("AWARD_SCAN_CONFIG") {
                Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
                _ => Self::from_default_location()?,
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override file settings with `AWARD_SCAN_OUTPUT`, `FETCHER_TYPE` and `SNAPSHOT_DIR`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(output) = env::var("AWARD_SCAN_OUTPUT") {
            if !output.trim().is_empty() {
                self.output.path = Some(PathBuf::from(output.trim()));
            }
        }
        if let Ok(fetcher_type) = env::var("FETCHER_TYPE") {
            if !fetcher_type.trim().is_empty() {
                self.fetcher.fetcher_type = fetcher_type.trim().to_string();
            }
        }
        if let Ok(dir) = env::var("SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.fetcher.snapshot_dir = Some(PathBuf::from(dir.trim()));
            }
        }
    }

    /// Validate the configuration into a [`ScanPlan`].
    pub fn into_plan(self) -> Result<ScanPlan, ConfigError> {
        let hub: AirportCode = self
            .hub
            .parse()
            .map_err(ConfigError::InvalidAirportCode)?;

        let routes = self.validate_routes(hub)?;
        let window = self.window.to_month_window()?;

        let reserved_before = parse_months(&self.window.reserved_before)?;
        let reserved_after = match &self.window.reserved_after {
            Some(months) => parse_months(months)?,
            None => vec![window.last().succ()],
        };
        for month in reserved_before.iter().chain(reserved_after.iter()) {
            if window.contains(*month) {
                return Err(ConfigError::ReservedMonthInWindow(month.to_string()));
            }
        }

        let fetcher = self.fetcher.to_plan()?;
        let output_path = self
            .output
            .path
            .clone()
            .unwrap_or_else(|| default_output_path(hub));

        let layout = ReportLayout::new(hub, window)
            .with_reserved_before(reserved_before)
            .with_reserved_after(reserved_after)
            .with_row_order(self.row_order);

        Ok(ScanPlan {
            routes,
            layout,
            fetcher,
            output_path,
        })
    }

    fn validate_routes(&self, hub: AirportCode) -> Result<Vec<RouteConfig>, ConfigError> {
        if self.airports.is_empty() {
            return Err(ConfigError::NoRoutes);
        }

        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(self.airports.len());
        for airport in &self.airports {
            let remote: AirportCode = airport
                .code
                .parse()
                .map_err(ConfigError::InvalidAirportCode)?;
            if remote == hub {
                return Err(ConfigError::HubAsRemote(remote.to_string()));
            }
            if !seen.insert(remote) {
                return Err(ConfigError::DuplicateAirport(remote.to_string()));
            }
            if airport.cap <= 0 {
                return Err(ConfigError::NonPositiveCap {
                    code: remote.to_string(),
                    cap: airport.cap,
                });
            }
            let cap = u32::try_from(airport.cap).map_err(|_| ConfigError::CapOutOfRange {
                code: remote.to_string(),
                cap: airport.cap,
            })?;
            routes.push(RouteConfig::new(Route::new(hub, remote), Points::new(cap)));
        }
        Ok(routes)
    }
}

impl WindowSettings {
    /// Resolve the scanned months.
    pub fn to_month_window(&self) -> Result<MonthWindow, ConfigError> {
        match (&self.months, &self.start, self.count) {
            (Some(months), None, None) => MonthWindow::new(parse_months(months)?),
            (None, Some(start), Some(count)) => {
                MonthWindow::consecutive(parse_month(start)?, count)
            }
            _ => Err(ConfigError::AmbiguousWindow),
        }
    }
}

impl FetcherSettings {
    /// Validate fetcher settings.
    pub fn to_plan(&self) -> Result<FetcherPlan, ConfigError> {
        let fetcher_type: FetcherType = self
            .fetcher_type
            .parse()
            .map_err(ConfigError::UnknownFetcherType)?;
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if fetcher_type == FetcherType::Snapshot && self.snapshot_dir.is_none() {
            return Err(ConfigError::MissingSnapshotDir);
        }
        Ok(FetcherPlan {
            fetcher_type,
            snapshot_dir: self.snapshot_dir.clone(),
            max_concurrent_fetches: self.max_concurrent_fetches,
            pause: Duration::from_millis(self.pause_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
hub = "PHX"

[window]
start = "2026-03"
count = 11

[[airports]]
code = "DEN"
cap = 4500

[[airports]]
code = "SEA"
cap = 7500
"#;

    #[test]
    fn test_parse_minimal_config() {
        let plan = ScanConfig::from_toml_str(MINIMAL)
            .unwrap()
            .into_plan()
            .unwrap();

        assert_eq!(plan.hub().as_str(), "PHX");
        assert_eq!(plan.routes.len(), 2);
        assert_eq!(plan.routes[0].route.remote.as_str(), "DEN");
        assert_eq!(plan.routes[0].cap, Points::new(4500));
        assert_eq!(plan.routes[1].route.remote.as_str(), "SEA");
        assert_eq!(plan.window().len(), 11);
        assert_eq!(plan.layout.row_order, RowOrder::Config);
        assert!(plan.layout.reserved_before.is_empty());
        assert_eq!(
            plan.layout.reserved_after,
            vec!["2027-02".parse::<YearMonth>().unwrap()]
        );
        assert_eq!(plan.fetcher.fetcher_type, FetcherType::Local);
        assert_eq!(plan.fetcher.max_concurrent_fetches, 2);
        assert_eq!(plan.output_path, PathBuf::from("awards_PHX.csv"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
hub = "phx"
row_order = "remote_code"

[window]
months = ["2026-03", "2026-04", "2026-06"]
reserved_before = ["2026-02"]
reserved_after = []

[fetcher]
type = "snapshot"
snapshot_dir = "captures"
max_concurrent_fetches = 4
pause_ms = 1000

[output]
path = "out/report.csv"

[[airports]]
code = "sea"
cap = 7500
"#;
        let plan = ScanConfig::from_toml_str(toml).unwrap().into_plan().unwrap();

        assert_eq!(plan.hub().as_str(), "PHX");
        assert_eq!(plan.layout.row_order, RowOrder::RemoteCode);
        assert_eq!(plan.window().len(), 3);
        assert_eq!(plan.layout.reserved_before.len(), 1);
        assert!(plan.layout.reserved_after.is_empty());
        assert_eq!(plan.fetcher.fetcher_type, FetcherType::Snapshot);
        assert_eq!(plan.fetcher.snapshot_dir, Some(PathBuf::from("captures")));
        assert_eq!(plan.fetcher.max_concurrent_fetches, 4);
        assert_eq!(plan.fetcher.pause, Duration::from_millis(1000));
        assert_eq!(plan.output_path, PathBuf::from("out/report.csv"));
    }

    fn plan_error(toml: &str) -> ConfigError {
        match ScanConfig::from_toml_str(toml) {
            Ok(config) => config.into_plan().unwrap_err(),
            Err(e) => e,
        }
    }

    #[test]
    fn test_non_positive_cap_is_rejected() {
        let toml = MINIMAL.replace("cap = 4500", "cap = 0");
        assert!(matches!(
            plan_error(&toml),
            ConfigError::NonPositiveCap { cap: 0, .. }
        ));

        let toml = MINIMAL.replace("cap = 4500", "cap = -10");
        assert!(matches!(
            plan_error(&toml),
            ConfigError::NonPositiveCap { cap: -10, .. }
        ));
    }

    #[test]
    fn test_empty_window_is_rejected() {
        let toml = MINIMAL.replace("count = 11", "count = 0");
        assert!(matches!(plan_error(&toml), ConfigError::EmptyWindow));
    }

    #[test]
    fn test_ambiguous_window_is_rejected() {
        let toml = MINIMAL.replace("count = 11", "count = 11\nmonths = [\"2026-03\"]");
        assert!(matches!(plan_error(&toml), ConfigError::AmbiguousWindow));

        let toml = MINIMAL.replace("count = 11", "");
        assert!(matches!(plan_error(&toml), ConfigError::AmbiguousWindow));
    }

    #[test]
    fn test_invalid_codes_and_duplicates() {
        let toml = MINIMAL.replace("code = \"DEN\"", "code = \"DENVER\"");
        assert!(matches!(
            plan_error(&toml),
            ConfigError::InvalidAirportCode(_)
        ));

        let toml = MINIMAL.replace("code = \"DEN\"", "code = \"SEA\"");
        assert!(matches!(plan_error(&toml), ConfigError::DuplicateAirport(_)));

        let toml = MINIMAL.replace("code = \"DEN\"", "code = \"PHX\"");
        assert!(matches!(plan_error(&toml), ConfigError::HubAsRemote(_)));
    }

    #[test]
    fn test_no_airports_is_rejected() {
        let toml = r#"
hub = "PHX"
[window]
start = "2026-03"
count = 1
"#;
        assert!(matches!(plan_error(toml), ConfigError::NoRoutes));
    }

    #[test]
    fn test_reserved_month_inside_window_is_rejected() {
        let toml = MINIMAL.replace("count = 11", "count = 11\nreserved_after = [\"2026-05\"]");
        assert!(matches!(
            plan_error(&toml),
            ConfigError::ReservedMonthInWindow(_)
        ));
    }

    #[test]
    fn test_fetcher_validation() {
        let settings = FetcherSettings {
            fetcher_type: "browser".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.to_plan(),
            Err(ConfigError::UnknownFetcherType(_))
        ));

        let settings = FetcherSettings {
            fetcher_type: "snapshot".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.to_plan(),
            Err(ConfigError::MissingSnapshotDir)
        ));

        let settings = FetcherSettings {
            max_concurrent_fetches: 0,
            ..Default::default()
        };
        assert!(matches!(settings.to_plan(), Err(ConfigError::ZeroConcurrency)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(
            ScanConfig::from_toml_str("hub = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = ScanConfig::from_file("/definitely/not/here/scan.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
