//! Airports, routes and per-route configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fare::{Direction, Points};

/// Three-letter IATA airport code, stored upper-case.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode([u8; 3]);

impl AirportCode {
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for AirportCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(format!(
                "Invalid airport code '{}': expected three letters",
                s
            ));
        }
        let mut code = [0u8; 3];
        for (slot, b) in code.iter_mut().zip(bytes) {
            *slot = b.to_ascii_uppercase();
        }
        Ok(AirportCode(code))
    }
}

impl TryFrom<String> for AirportCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered (hub, remote) airport pair priced as one unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub hub: AirportCode,
    pub remote: AirportCode,
}

impl Route {
    pub fn new(hub: AirportCode, remote: AirportCode) -> Self {
        Self { hub, remote }
    }

    /// Departure airport of the leg flown in `direction`.
    pub fn origin(&self, direction: Direction) -> AirportCode {
        match direction {
            Direction::Outbound => self.hub,
            Direction::Return => self.remote,
        }
    }

    /// Arrival airport of the leg flown in `direction`.
    pub fn destination(&self, direction: Direction) -> AirportCode {
        match direction {
            Direction::Outbound => self.remote,
            Direction::Return => self.hub,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.hub, self.remote)
    }
}

/// A route together with the highest points price worth reporting on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub route: Route,
    pub cap: Points,
}

impl RouteConfig {
    pub fn new(route: Route, cap: Points) -> Self {
        Self { route, cap }
    }
}
