//! CLI entry point for the airline demand dashboard.
//!
//! Each invocation is one dashboard session: fetch live data or load the
//! cached payload, apply the filter groups, then render, export or summarize.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flight_demand::analyzers::insight::generate_insight_with;
use flight_demand::{
    cache::PayloadCache,
    config::Config,
    filter::{Filters, Selection, apply_filters},
    infra::aviationstack::AviationStackClient,
    infra::huggingface::HostedSummarizer,
    normalize::DropReport,
    output::{EXPORT_FILENAME, export_csv, print_json, render_dashboard},
    session::Session,
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_demand")]
#[command(about = "Airline booking market demand dashboard", long_about = None)]
struct Cli {
    /// Cache file holding the last fetched payload
    #[arg(long, global = true, value_name = "PATH")]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Fetch live data (one API call) instead of loading the cache
    #[arg(long)]
    live: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live flight data and cache it
    Fetch,
    /// Render top routes, detail table, volume chart and AI insights
    Dashboard {
        #[command(flatten)]
        source: SourceArgs,

        /// Airline filter for the top-routes view (repeatable)
        #[arg(long = "top-airline", value_name = "AIRLINE")]
        top_airlines: Vec<String>,

        /// Route filter for the top-routes view, e.g. "JFK → LAX" (repeatable)
        #[arg(long = "top-route", value_name = "ROUTE")]
        top_routes: Vec<String>,

        /// Airline filter for the detail view (repeatable)
        #[arg(long = "airline", value_name = "AIRLINE")]
        airlines: Vec<String>,

        /// Route filter for the detail view (repeatable)
        #[arg(long = "route", value_name = "ROUTE")]
        routes: Vec<String>,

        /// Also write the filtered detail table as CSV
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = EXPORT_FILENAME)]
        export: Option<PathBuf>,

        /// Print the view as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Skip the summarization model call
        #[arg(long)]
        no_summary: bool,
    },
    /// List the airline and route choices available for filtering
    Options {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write the filtered table as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Airline filter (repeatable)
        #[arg(long = "airline", value_name = "AIRLINE")]
        airlines: Vec<String>,

        /// Route filter (repeatable)
        #[arg(long = "route", value_name = "ROUTE")]
        routes: Vec<String>,

        /// Output file
        #[arg(short, long, default_value = EXPORT_FILENAME)]
        output: PathBuf,
    },
}

fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/flight_demand.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_demand.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let cache = PayloadCache::new(cli.cache.clone().unwrap_or_else(|| config.cache_file.clone()));
    let mut session = Session::new();

    match cli.command {
        Commands::Fetch => {
            populate(&mut session, &config, &cache, &SourceArgs { live: true }).await?;
        }
        Commands::Dashboard {
            source,
            top_airlines,
            top_routes,
            airlines,
            routes,
            export,
            json,
            no_summary,
        } => {
            populate(&mut session, &config, &cache, &source).await?;
            if !session.has_data() {
                warn!("No flights to show. Fetch live data or load the cache first.");
                return Ok(());
            }

            let filters = Filters {
                top: Selection::new(top_airlines, top_routes),
                detail: Selection::new(airlines, routes),
            };
            let view = session.view(&filters);

            if let Some(path) = export {
                export_csv(&path, view.detail_table())?;
            }

            let insight = if no_summary {
                None
            } else {
                info!("Analyzing data with AI");
                Some(
                    generate_insight_with(
                        HostedSummarizer::from_config(&config),
                        &view.summary_text,
                    )
                    .await,
                )
            };

            let mut out = std::io::stdout().lock();
            if json {
                print_json(&mut out, &view, insight.as_deref())?;
            } else {
                render_dashboard(&mut out, &view, insight.as_deref())?;
            }
        }
        Commands::Options { source } => {
            populate(&mut session, &config, &cache, &source).await?;

            let mut out = std::io::stdout().lock();
            writeln!(out, "Airlines:")?;
            for airline in session.airline_options() {
                writeln!(out, "  {airline}")?;
            }
            writeln!(out, "Routes:")?;
            for route in session.route_options() {
                writeln!(out, "  {route}")?;
            }
        }
        Commands::Export {
            source,
            airlines,
            routes,
            output,
        } => {
            populate(&mut session, &config, &cache, &source).await?;
            let filtered = apply_filters(session.table(), &Selection::new(airlines, routes));
            export_csv(&output, &filtered)?;
        }
    }

    Ok(())
}

/// Fills the session from the live API or the cache, per `source`.
#[tracing::instrument(skip_all, fields(live = source.live, cache = %cache.path().display()))]
async fn populate(
    session: &mut Session,
    config: &Config,
    cache: &PayloadCache,
    source: &SourceArgs,
) -> Result<()> {
    let report = if source.live {
        let client = AviationStackClient::from_config(config)?;
        session
            .fetch_live(&client, cache)
            .await
            .context("Live fetch failed")?
    } else {
        session
            .load_cached(cache)
            .context("Loading cached data failed")?
    };

    log_report(&report, source.live);
    Ok(())
}

fn log_report(report: &DropReport, live: bool) {
    let origin = if live { "live" } else { "cache" };
    info!(
        origin,
        received = report.received,
        kept = report.kept,
        dropped = report.dropped(),
        "Flight data loaded"
    );
}
