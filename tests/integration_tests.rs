use flight_demand::analyzers::aggregate::{TOP_ROUTES, top_routes};
use flight_demand::cache::PayloadCache;
use flight_demand::filter::{Filters, Selection, apply_filters};
use flight_demand::normalize::normalize;
use flight_demand::output::{read_csv, to_csv_bytes};
use flight_demand::parser::parse_payload;
use flight_demand::session::Session;

fn fixture() -> serde_json::Value {
    let bytes = include_bytes!("fixtures/flights.json");
    parse_payload(bytes).expect("Failed to parse fixture")
}

#[test]
fn test_full_pipeline() {
    let normalized = normalize(&fixture());

    // Two rows lack a departure time or an origin airport.
    assert_eq!(normalized.report.received, 7);
    assert_eq!(normalized.table.len(), 5);
    assert_eq!(normalized.report.missing_departure, 1);
    assert_eq!(normalized.report.missing_origin, 1);

    let top = top_routes(&normalized.table, TOP_ROUTES);
    assert_eq!(top[0].route().to_string(), "John F Kennedy International → Heathrow");
    assert_eq!(top[0].count, 3);

    // Offsets are dropped, the wall-clock time stays.
    let dubai = normalized
        .table
        .iter()
        .find(|r| r.from == "Dubai")
        .expect("Dubai departure kept");
    assert_eq!(dubai.departure_time.to_string(), "2024-01-03 03:00:00");
    assert_eq!(dubai.arrival_time.unwrap().to_string(), "2024-01-03 09:00:00");
}

#[test]
fn test_filtered_export_round_trip() {
    let table = normalize(&fixture()).table;
    let filtered = apply_filters(
        &table,
        &Selection::new(vec!["British Airways".to_string()], vec![]),
    );
    assert_eq!(filtered.len(), 2);

    let bytes = to_csv_bytes(&filtered).unwrap();
    let parsed = read_csv(bytes.as_slice()).unwrap();
    assert_eq!(parsed.len(), filtered.len());
    let numbers: Vec<_> = parsed.iter().map(|r| r.flight_number.clone()).collect();
    assert_eq!(numbers, vec![Some("178".to_string()), Some("178".to_string())]);
}

#[test]
fn test_session_from_cache() {
    let path = std::env::temp_dir().join("flight_demand_integration_cache.json");
    let cache = PayloadCache::new(&path);
    cache.save(&fixture()).unwrap();

    let mut session = Session::new();
    let report = session.load_cached(&cache).unwrap();
    assert_eq!(report.kept, 5);

    let view = session.view(&Filters {
        top: Selection::default(),
        detail: Selection::new(vec![], vec!["Heathrow → Dubai".to_string()]),
    });
    assert_eq!(view.detail.len(), 1);
    assert_eq!(view.top_routes.len(), 3);
    assert!(view.summary_text.contains("Emirates (1)"));

    std::fs::remove_file(&path).unwrap();
}
