//! User-selected inclusion filters over a [`FlightTable`].

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::normalize::{FlightRecord, FlightTable};

/// Ordered origin/destination airport pair. Displayed as `"{from} → {to}"`,
/// which is also the form route filters are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

/// One group of multi-select choices. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub airlines: Vec<String>,
    pub routes: Vec<String>,
}

impl Selection {
    pub fn new(airlines: Vec<String>, routes: Vec<String>) -> Self {
        Self { airlines, routes }
    }
}

/// The two independent filter groups of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Drives the top-routes table and bar chart.
    pub top: Selection,
    /// Drives the detail table, time series, export and insights.
    pub detail: Selection,
}

/// Returns the rows matching both the airline and the route selection.
///
/// Each part is skipped when empty. The input table is never modified.
pub fn apply_filters(table: &FlightTable, selection: &Selection) -> FlightTable {
    let airlines: HashSet<&str> = selection.airlines.iter().map(String::as_str).collect();
    let routes: HashSet<&str> = selection.routes.iter().map(String::as_str).collect();

    let keep = |row: &FlightRecord| {
        (airlines.is_empty() || airlines.contains(row.airline.as_str()))
            && (routes.is_empty() || routes.contains(row.route().to_string().as_str()))
    };

    table.iter().filter(|row| keep(row)).cloned().collect()
}

/// Sorted distinct airline names, as offered to the airline multi-select.
pub fn airline_options(table: &FlightTable) -> Vec<String> {
    table
        .iter()
        .map(|r| r.airline.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sorted distinct `"{from} → {to}"` labels, as offered to the route multi-select.
pub fn route_options(table: &FlightTable) -> Vec<String> {
    table
        .iter()
        .map(|r| r.route().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(airline: &str, from: &str, to: &str, number: &str) -> FlightRecord {
        FlightRecord {
            flight_date: Some("2024-01-01".to_string()),
            flight_status: Some("active".to_string()),
            airline: airline.to_string(),
            flight_number: Some(number.to_string()),
            from: from.to_string(),
            from_iata: None,
            to: to.to_string(),
            to_iata: None,
            departure_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            arrival_time: None,
        }
    }

    fn sample() -> FlightTable {
        FlightTable::new(vec![
            row("A1", "X", "Y", "1"),
            row("A2", "X", "Y", "2"),
            row("A1", "Y", "Z", "3"),
            row("A3", "X", "Z", "4"),
        ])
    }

    #[test]
    fn test_route_display() {
        let route = Route { from: "JFK", to: "LHR" };
        assert_eq!(route.to_string(), "JFK → LHR");
    }

    #[test]
    fn test_no_selection_is_identity() {
        let table = sample();
        let filtered = apply_filters(&table, &Selection::default());
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_airline_only() {
        let table = sample();
        let filtered = apply_filters(&table, &Selection::new(vec!["A1".into()], vec![]));

        let manual = table.iter().filter(|r| r.airline == "A1").count();
        assert_eq!(filtered.len(), manual);
        assert!(filtered.iter().all(|r| r.airline == "A1"));
    }

    #[test]
    fn test_route_only() {
        let filtered = apply_filters(&sample(), &Selection::new(vec![], vec!["X → Y".into()]));
        let numbers: Vec<_> = filtered
            .iter()
            .map(|r| r.flight_number.as_deref().unwrap())
            .collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let selection = Selection::new(vec!["A1".into()], vec!["X → Y".into(), "X → Z".into()]);
        let filtered = apply_filters(&sample(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].flight_number.as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_selection_yields_empty() {
        let filtered = apply_filters(&sample(), &Selection::new(vec!["Nobody".into()], vec![]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_input_table_untouched() {
        let table = sample();
        let before = table.clone();
        let _ = apply_filters(&table, &Selection::new(vec!["A3".into()], vec![]));
        assert_eq!(table, before);
    }

    #[test]
    fn test_options_sorted_and_distinct() {
        let table = sample();
        assert_eq!(airline_options(&table), vec!["A1", "A2", "A3"]);
        assert_eq!(route_options(&table), vec!["X → Y", "X → Z", "Y → Z"]);
    }
}
