#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use award_floor::config::ScanPlan;
use award_floor::fetcher::LocalFetcher;
use award_floor::models::{
    AirportCode, Direction, MonthWindow, Points, Route, RouteConfig, TaxAmount, YearMonth,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process-wide environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn code(s: &str) -> AirportCode {
    s.parse().unwrap()
}

pub fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}

pub fn route(remote: &str) -> Route {
    Route::new(code("PHX"), code(remote))
}

pub fn window(start: &str, count: usize) -> MonthWindow {
    MonthWindow::consecutive(month(start), count).unwrap()
}

/// PHX plan over `window` with `(remote, cap)` routes in the given order.
pub fn plan(routes: &[(&str, u32)], window: MonthWindow) -> ScanPlan {
    let routes = routes
        .iter()
        .map(|(remote, cap)| RouteConfig::new(route(remote), Points::new(*cap)))
        .collect();
    ScanPlan::new(code("PHX"), routes, window)
}

/// Register `(day, points, tax dollars)` cells for one page.
pub fn seed(
    fetcher: &LocalFetcher,
    remote: &str,
    direction: Direction,
    m: &str,
    days: &[(u8, u32, u64)],
) {
    fetcher.insert_days(
        route(remote),
        direction,
        month(m),
        days.iter().map(|(day, points, tax)| {
            (*day, Points::new(*points), Some(TaxAmount::from_dollars(*tax)))
        }),
    );
}
