//! Derived tables produced by the aggregation step.

use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::Route;

/// Number of flights on one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    pub from: String,
    pub to: String,
    pub count: usize,
}

impl RouteCount {
    pub fn route(&self) -> Route<'_> {
        Route {
            from: &self.from,
            to: &self.to,
        }
    }
}

/// Number of flights operated by one airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineCount {
    pub airline: String,
    pub count: usize,
}

/// Number of scheduled departures on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub flights: usize,
}
