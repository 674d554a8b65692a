//! One dashboard session: the current table and the actions that replace it.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::analyzers::aggregate::{TOP_ROUTES, airline_counts, daily_volume, top_routes};
use crate::analyzers::insight::prepare_summary_text;
use crate::analyzers::types::{AirlineCount, DailyCount, RouteCount};
use crate::cache::PayloadCache;
use crate::error::Result;
use crate::filter::{Filters, apply_filters, airline_options, route_options};
use crate::normalize::{DropReport, FlightRecord, FlightTable, Normalized, normalize};
use crate::services::flight_source::FlightSource;

/// Owns the normalized table for the lifetime of one session.
///
/// Every successful fetch or load rebuilds the table from scratch. A failed
/// action leaves the previous table in place.
#[derive(Debug, Default)]
pub struct Session {
    table: FlightTable,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &FlightTable {
        &self.table
    }

    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    /// Replaces the table with the normalization of `payload`.
    pub fn replace_from(&mut self, payload: &Value) -> DropReport {
        let Normalized { table, report } = normalize(payload);
        info!(rows = table.len(), dropped = report.dropped(), "Flight table rebuilt");
        self.table = table;
        report
    }

    /// Fetches live data, caches the payload, then rebuilds the table.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_live<S: FlightSource + ?Sized>(
        &mut self,
        source: &S,
        cache: &PayloadCache,
    ) -> Result<DropReport> {
        let payload = source.fetch_payload().await?;
        if let Err(e) = cache.save(&payload) {
            warn!(error = %e, "Failed to cache live payload");
            return Err(e);
        }
        Ok(self.replace_from(&payload))
    }

    /// Rebuilds the table from the cached payload.
    #[tracing::instrument(skip_all, fields(path = %cache.path().display()))]
    pub fn load_cached(&mut self, cache: &PayloadCache) -> Result<DropReport> {
        let payload = cache.load()?;
        Ok(self.replace_from(&payload))
    }

    pub fn airline_options(&self) -> Vec<String> {
        airline_options(&self.table)
    }

    pub fn route_options(&self) -> Vec<String> {
        route_options(&self.table)
    }

    /// Computes every view for the given filter groups.
    pub fn view(&self, filters: &Filters) -> DashboardView {
        DashboardView::build(&self.table, filters)
    }
}

/// Everything one render of the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Busiest routes under the top-routes filter group.
    pub top_routes: Vec<RouteCount>,
    /// Rows under the detail filter group, ordered by departure.
    pub detail: Vec<FlightRecord>,
    /// Flights per date under the detail filter group.
    pub volume: Vec<DailyCount>,
    pub airlines: Vec<AirlineCount>,
    /// Text passed to the summarizer.
    pub summary_text: String,
    #[serde(skip)]
    detail_table: FlightTable,
}

impl DashboardView {
    pub fn build(table: &FlightTable, filters: &Filters) -> Self {
        let top_table = apply_filters(table, &filters.top);
        let detail_table = apply_filters(table, &filters.detail);

        Self {
            top_routes: top_routes(&top_table, TOP_ROUTES),
            detail: detail_table.sorted_by_departure(),
            volume: daily_volume(&detail_table),
            airlines: airline_counts(&detail_table),
            summary_text: prepare_summary_text(&detail_table),
            detail_table,
        }
    }

    /// The filtered detail rows in table order, as exported to CSV.
    pub fn detail_table(&self) -> &FlightTable {
        &self.detail_table
    }
}
