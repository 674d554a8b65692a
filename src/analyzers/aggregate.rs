use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::analyzers::types::{AirlineCount, DailyCount, RouteCount};
use crate::normalize::FlightTable;

/// Rows shown in the top-routes table and chart.
pub const TOP_ROUTES: usize = 10;

/// Counts occurrences of each key, keeping the order in which keys first
/// appear. The result is sorted by descending count; the sort is stable, so
/// ties keep first-seen order.
fn count_in_order<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Hash + Eq + Copy,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Groups by `(from, to)` and returns the `n` busiest routes, most flights
/// first. Equal counts keep first-seen order.
pub fn top_routes(table: &FlightTable, n: usize) -> Vec<RouteCount> {
    count_in_order(table.iter().map(|r| (r.from.as_str(), r.to.as_str())))
        .into_iter()
        .take(n)
        .map(|((from, to), count)| RouteCount {
            from: from.to_string(),
            to: to.to_string(),
            count,
        })
        .collect()
}

/// Flights per airline, most flights first. Equal counts keep first-seen order.
pub fn airline_counts(table: &FlightTable) -> Vec<AirlineCount> {
    count_in_order(table.iter().map(|r| r.airline.as_str()))
        .into_iter()
        .map(|(airline, count)| AirlineCount {
            airline: airline.to_string(),
            count,
        })
        .collect()
}

/// The `n` airlines with the most flights.
pub fn top_airlines(table: &FlightTable, n: usize) -> Vec<AirlineCount> {
    let mut counts = airline_counts(table);
    counts.truncate(n);
    counts
}

/// Flights per departure date in chronological order.
pub fn daily_volume(table: &FlightTable) -> Vec<DailyCount> {
    let mut by_date = BTreeMap::new();
    for row in table {
        *by_date.entry(row.departure_date()).or_insert(0usize) += 1;
    }

    by_date
        .into_iter()
        .map(|(date, flights)| DailyCount { date, flights })
        .collect()
}

/// The `n` dates with the most departures. Equal counts are ordered by date.
pub fn peak_dates(table: &FlightTable, n: usize) -> Vec<DailyCount> {
    let mut days = daily_volume(table);
    days.sort_by(|a, b| b.flights.cmp(&a.flights));
    days.truncate(n);
    days
}
