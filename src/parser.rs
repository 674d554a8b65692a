//! Decoding of AviationStack `/flights` payloads.
//!
//! The payload is kept as a [`serde_json::Value`] so that the cache stores it
//! verbatim. Individual records are decoded into [`RawFlight`] one at a time;
//! a record with an unexpected shape fails alone.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// Decodes a JSON payload from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON.
pub fn parse_payload(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Returns the `data` list of a payload, or `None` if the payload has none.
pub fn data_records(payload: &Value) -> Option<&Vec<Value>> {
    payload.get("data")?.as_array()
}

/// Describes an API-level error object (`{"error": {"code", "message"}}`).
pub fn api_error_detail(payload: &Value) -> String {
    let Some(error) = payload.get("error") else {
        return "payload has no 'data' field".to_string();
    };

    let code = error.get("code").and_then(Value::as_str);
    let message = error
        .get("message")
        .or_else(|| error.get("info"))
        .and_then(Value::as_str);

    match (code, message) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_string(),
        (Some(code), None) => code.to_string(),
        (None, None) => error.to_string(),
    }
}

/// Optional codes and labels arrive as `""` when unknown; treat that as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// One element of the `data` list, as delivered by the API.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawFlight {
    pub flight_date: Option<String>,
    pub flight_status: Option<String>,
    pub airline: Option<RawAirline>,
    pub flight: Option<RawFlightId>,
    pub departure: Option<RawEndpoint>,
    pub arrival: Option<RawEndpoint>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawAirline {
    pub name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawFlightId {
    pub number: Option<String>,
}

/// Departure or arrival block.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawEndpoint {
    pub airport: Option<String>,
    pub iata: Option<String>,
    pub scheduled: Option<String>,
}

impl RawFlight {
    /// Decodes a single record.
    ///
    /// # Errors
    ///
    /// Fails when a known field has the wrong JSON type, e.g. a string where
    /// the `airline` object is expected.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn flight_date(&self) -> Option<&str> {
        non_empty(self.flight_date.as_deref())
    }

    pub fn flight_status(&self) -> Option<&str> {
        non_empty(self.flight_status.as_deref())
    }

    pub fn airline_name(&self) -> Option<&str> {
        self.airline.as_ref()?.name.as_deref()
    }

    pub fn flight_number(&self) -> Option<&str> {
        non_empty(self.flight.as_ref()?.number.as_deref())
    }

    pub fn origin_airport(&self) -> Option<&str> {
        self.departure.as_ref()?.airport.as_deref()
    }

    pub fn origin_iata(&self) -> Option<&str> {
        non_empty(self.departure.as_ref()?.iata.as_deref())
    }

    pub fn destination_airport(&self) -> Option<&str> {
        self.arrival.as_ref()?.airport.as_deref()
    }

    pub fn destination_iata(&self) -> Option<&str> {
        non_empty(self.arrival.as_ref()?.iata.as_deref())
    }

    pub fn departure_scheduled(&self) -> Option<&str> {
        self.departure.as_ref()?.scheduled.as_deref()
    }

    pub fn arrival_scheduled(&self) -> Option<&str> {
        self.arrival.as_ref()?.scheduled.as_deref()
    }
}
