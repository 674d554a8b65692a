//! Output formatting for the dashboard.
//!
//! Supports CSV export of the filtered table, JSON serialization of a whole
//! view, and plain-text tables and charts for the terminal.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::analyzers::types::{AirlineCount, DailyCount, RouteCount};
use crate::normalize::{COLUMNS, FlightRecord, FlightTable, TIMESTAMP_FORMAT};
use crate::session::DashboardView;

/// File name used for exported tables.
pub const EXPORT_FILENAME: &str = "filtered_flights.csv";

const BAR_WIDTH: usize = 40;

/// Writes `table` as CSV: header row first, even when there are no rows.
pub fn write_csv<W: Write>(writer: W, table: &FlightTable) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(COLUMNS)?;
    for row in table {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Serializes `table` to UTF-8 CSV bytes, ready to be offered for download.
pub fn to_csv_bytes(table: &FlightTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table)?;
    Ok(buf)
}

/// Writes `table` to `path`, replacing any existing file.
pub fn export_csv(path: &Path, table: &FlightTable) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, table)?;
    info!(path = %path.display(), rows = table.len(), "Exported CSV");
    Ok(())
}

/// Parses CSV produced by [`write_csv`] back into a table.
pub fn read_csv<R: Read>(reader: R) -> Result<FlightTable> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: FlightRecord = result?;
        rows.push(record);
    }

    Ok(FlightTable::new(rows))
}

/// Writes the view as pretty-printed JSON.
pub fn print_json<W: Write>(mut out: W, view: &DashboardView, insight: Option<&str>) -> Result<()> {
    let value = serde_json::json!({
        "view": view,
        "insight": insight,
    });
    serde_json::to_writer_pretty(&mut out, &value)?;
    writeln!(out)?;
    Ok(())
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Top-routes table.
pub fn render_top_routes<W: Write>(out: &mut W, routes: &[RouteCount]) -> Result<()> {
    writeln!(out, "Top {} Popular Routes", routes.len())?;
    if routes.is_empty() {
        writeln!(out, "  (no routes)")?;
        return Ok(());
    }
    writeln!(out, "  {:<36} {:<36} {:>5}", "from", "to", "count")?;
    for r in routes {
        writeln!(out, "  {:<36} {:<36} {:>5}", r.from, r.to, r.count)?;
    }
    Ok(())
}

/// Horizontal bars of count by destination, grouped by origin.
pub fn render_route_chart<W: Write>(out: &mut W, routes: &[RouteCount]) -> Result<()> {
    writeln!(out, "Most Frequent Routes")?;
    let max = routes.iter().map(|r| r.count).max().unwrap_or(0);

    let mut by_origin: BTreeMap<&str, Vec<&RouteCount>> = BTreeMap::new();
    for r in routes {
        by_origin.entry(r.from.as_str()).or_default().push(r);
    }

    for (origin, group) in by_origin {
        writeln!(out, "  [{origin}]")?;
        for r in group {
            writeln!(out, "    {:<32} {} {}", r.to, bar(r.count, max), r.count)?;
        }
    }
    Ok(())
}

/// Detail table of individual flights.
pub fn render_detail<W: Write>(out: &mut W, rows: &[FlightRecord]) -> Result<()> {
    writeln!(out, "Detailed Flight Data ({} rows)", rows.len())?;
    writeln!(
        out,
        "  {:<10} {:<10} {:<24} {:<7} {:<28} {:<4} {:<28} {:<4} {:<19} {:<19}",
        "date", "status", "airline", "number", "from", "iata", "to", "iata", "departure", "arrival"
    )?;
    for r in rows {
        let arrival = r
            .arrival_time
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:<10} {:<10} {:<24} {:<7} {:<28} {:<4} {:<28} {:<4} {:<19} {:<19}",
            opt(&r.flight_date),
            opt(&r.flight_status),
            r.airline,
            opt(&r.flight_number),
            r.from,
            opt(&r.from_iata),
            r.to,
            opt(&r.to_iata),
            r.departure_time.format(TIMESTAMP_FORMAT).to_string(),
            arrival,
        )?;
    }
    Ok(())
}

/// Flights-per-date series, one line per date.
pub fn render_volume<W: Write>(out: &mut W, volume: &[DailyCount]) -> Result<()> {
    writeln!(out, "Flight Volume Over Time")?;
    let max = volume.iter().map(|d| d.flights).max().unwrap_or(0);
    for d in volume {
        writeln!(out, "  {} {} {}", d.date, bar(d.flights, max), d.flights)?;
    }
    Ok(())
}

pub fn render_airlines<W: Write>(out: &mut W, airlines: &[AirlineCount]) -> Result<()> {
    writeln!(out, "Flights by Airline")?;
    let max = airlines.iter().map(|a| a.count).max().unwrap_or(0);
    for a in airlines {
        writeln!(out, "  {:<32} {} {}", a.airline, bar(a.count, max), a.count)?;
    }
    Ok(())
}

/// Renders every section of the view, followed by the insight if any.
pub fn render_dashboard<W: Write>(
    out: &mut W,
    view: &DashboardView,
    insight: Option<&str>,
) -> Result<()> {
    debug!(
        top_routes = view.top_routes.len(),
        detail_rows = view.detail.len(),
        "Rendering dashboard"
    );

    render_top_routes(out, &view.top_routes)?;
    writeln!(out)?;
    render_route_chart(out, &view.top_routes)?;
    writeln!(out)?;
    render_detail(out, &view.detail)?;
    writeln!(out)?;
    render_volume(out, &view.volume)?;
    writeln!(out)?;
    render_airlines(out, &view.airlines)?;

    if let Some(insight) = insight {
        writeln!(out)?;
        writeln!(out, "AI-Generated Insights")?;
        writeln!(out, "  Summary: {insight}")?;
    }
    out.flush()?;
    Ok(())
}
