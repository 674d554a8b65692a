//! Flattening of raw flight records into the typed [`FlightTable`].
//!
//! A record is kept only when it has an airline name, an origin airport, a
//! destination airport and a parseable scheduled departure. Timestamps keep
//! their wall-clock value; any UTC offset is dropped, not applied.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::filter::Route;
use crate::parser::{RawFlight, data_records};

/// Column order of the normalized table, as displayed and exported.
pub const COLUMNS: [&str; 10] = [
    "flight_date",
    "flight_status",
    "airline",
    "flight_number",
    "from",
    "from_iata",
    "to",
    "to_iata",
    "departure_time",
    "arrival_time",
];

/// Format used when timestamps are written out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One row of the normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub flight_date: Option<String>,
    pub flight_status: Option<String>,
    pub airline: String,
    pub flight_number: Option<String>,
    pub from: String,
    pub from_iata: Option<String>,
    pub to: String,
    pub to_iata: Option<String>,
    #[serde(with = "timestamp")]
    pub departure_time: NaiveDateTime,
    #[serde(with = "timestamp::option")]
    pub arrival_time: Option<NaiveDateTime>,
}

impl FlightRecord {
    pub fn route(&self) -> Route<'_> {
        Route {
            from: &self.from,
            to: &self.to,
        }
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_time.date()
    }
}

/// The flat row-set derived from one payload. Rebuilt from scratch on every
/// fetch or cache load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightTable {
    rows: Vec<FlightRecord>,
}

impl FlightTable {
    pub fn new(rows: Vec<FlightRecord>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[FlightRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.rows.iter()
    }

    /// Rows ordered by scheduled departure. The table itself is untouched.
    pub fn sorted_by_departure(&self) -> Vec<FlightRecord> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| r.departure_time);
        rows
    }
}

impl<'a> IntoIterator for &'a FlightTable {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<FlightRecord> for FlightTable {
    fn from_iter<I: IntoIterator<Item = FlightRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Why a raw record did not make it into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Malformed,
    MissingAirline,
    MissingOrigin,
    MissingDestination,
    MissingDeparture,
}

/// Per-reason counts of the records left out of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropReport {
    pub received: usize,
    pub kept: usize,
    pub malformed: usize,
    pub missing_airline: usize,
    pub missing_origin: usize,
    pub missing_destination: usize,
    pub missing_departure: usize,
}

impl DropReport {
    pub fn dropped(&self) -> usize {
        self.received - self.kept
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Malformed => self.malformed += 1,
            DropReason::MissingAirline => self.missing_airline += 1,
            DropReason::MissingOrigin => self.missing_origin += 1,
            DropReason::MissingDestination => self.missing_destination += 1,
            DropReason::MissingDeparture => self.missing_departure += 1,
        }
    }
}

/// Result of normalizing one payload.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub table: FlightTable,
    pub report: DropReport,
}

/// Builds a [`FlightTable`] from a `{"data": [...]}` payload.
///
/// A payload without a `data` list yields an empty table. Bad records are
/// dropped and counted in the returned [`DropReport`].
pub fn normalize(payload: &Value) -> Normalized {
    let Some(records) = data_records(payload) else {
        warn!("Payload has no 'data' list, producing empty table");
        return Normalized::default();
    };

    let mut report = DropReport {
        received: records.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(records.len());

    for (index, value) in records.iter().enumerate() {
        let outcome = RawFlight::from_value(value)
            .map_err(|e| {
                debug!(index, error = %e, "Record has unexpected shape");
                DropReason::Malformed
            })
            .and_then(|raw| flatten(&raw));

        match outcome {
            Ok(row) => rows.push(row),
            Err(reason) => {
                debug!(index, ?reason, "Dropping record");
                report.record(reason);
            }
        }
    }

    report.kept = rows.len();
    if report.dropped() > 0 {
        warn!(
            received = report.received,
            kept = report.kept,
            malformed = report.malformed,
            missing_airline = report.missing_airline,
            missing_origin = report.missing_origin,
            missing_destination = report.missing_destination,
            missing_departure = report.missing_departure,
            "Dropped incomplete flight records"
        );
    }

    Normalized {
        table: FlightTable::new(rows),
        report,
    }
}

/// Turns one raw record into a row, or says why it cannot be one.
pub fn flatten(raw: &RawFlight) -> Result<FlightRecord, DropReason> {
    let departure_time = raw
        .departure_scheduled()
        .and_then(parse_timestamp)
        .ok_or(DropReason::MissingDeparture)?;
    let from = raw.origin_airport().ok_or(DropReason::MissingOrigin)?;
    let to = raw
        .destination_airport()
        .ok_or(DropReason::MissingDestination)?;
    let airline = raw.airline_name().ok_or(DropReason::MissingAirline)?;

    Ok(FlightRecord {
        flight_date: raw.flight_date().map(str::to_string),
        flight_status: raw.flight_status().map(str::to_string),
        airline: airline.to_string(),
        flight_number: raw.flight_number().map(str::to_string),
        from: from.to_string(),
        from_iata: raw.origin_iata().map(str::to_string),
        to: to.to_string(),
        to_iata: raw.destination_iata().map(str::to_string),
        departure_time,
        arrival_time: raw.arrival_scheduled().and_then(parse_timestamp),
    })
}

/// Parses a scheduled time into a naive wall-clock timestamp.
///
/// Offsets are discarded: `2024-01-01T10:00:00+05:00` becomes
/// `2024-01-01 10:00:00`. Returns `None` for anything unparseable.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde adapter writing timestamps as `YYYY-MM-DD HH:MM:SS`.
pub(crate) mod timestamp {
    use super::{TIMESTAMP_FORMAT, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub mod option {
        use super::{TIMESTAMP_FORMAT, parse_timestamp};
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(ts) => s.collect_str(&ts.format(TIMESTAMP_FORMAT)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse_timestamp(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
                None => Ok(None),
            }
        }
    }
}
