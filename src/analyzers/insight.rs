//! Text handed to the summarization model, and the guarded call around it.

use tracing::{debug, warn};

use crate::analyzers::aggregate::{peak_dates, top_airlines, top_routes};
use crate::normalize::FlightTable;
use crate::services::summarizer::Summarizer;

/// Entries listed per section of the summary text.
pub const SUMMARY_TOP_N: usize = 3;

/// Inputs shorter than this (after trimming) are not sent to the model.
pub const MIN_SUMMARY_INPUT: usize = 20;

pub const NO_DATA_TEXT: &str = "No data to summarize.";
pub const NOT_ENOUGH_TEXT: &str = "Not enough text to summarize.";

/// Describes the busiest routes, airlines and dates of `table` in plain text.
pub fn prepare_summary_text(table: &FlightTable) -> String {
    if table.is_empty() {
        return NO_DATA_TEXT.to_string();
    }

    let routes = top_routes(table, SUMMARY_TOP_N)
        .iter()
        .map(|r| format!("{} ({})", r.route(), r.count))
        .collect::<Vec<_>>()
        .join(", ");
    let airlines = top_airlines(table, SUMMARY_TOP_N)
        .iter()
        .map(|a| format!("{} ({})", a.airline, a.count))
        .collect::<Vec<_>>()
        .join(", ");
    let dates = peak_dates(table, SUMMARY_TOP_N)
        .iter()
        .map(|d| format!("{} ({})", d.date, d.flights))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Top Routes: {routes}\nTop Airlines: {airlines}\nPeak Dates: {dates}")
}

/// Runs the summarizer and always returns something displayable.
///
/// Failures come back as `"Error generating summary: ..."` so the rest of
/// the dashboard still renders.
pub async fn generate_insight<S: Summarizer + ?Sized>(summarizer: &S, text: &str) -> String {
    if text.trim().chars().count() < MIN_SUMMARY_INPUT {
        debug!(len = text.len(), "Summary input too short, skipping model call");
        return NOT_ENOUGH_TEXT.to_string();
    }

    match summarizer.summarize(text).await {
        Ok(summary) => summary,
        Err(e) => failure_text(&e),
    }
}

/// Like [`generate_insight`], but also folds a failed summarizer setup
/// (bad token, client build error) into the inline error string.
pub async fn generate_insight_with<S: Summarizer>(
    summarizer: anyhow::Result<S>,
    text: &str,
) -> String {
    match summarizer {
        Ok(summarizer) => generate_insight(&summarizer, text).await,
        Err(e) => failure_text(&e),
    }
}

fn failure_text(e: &anyhow::Error) -> String {
    warn!(error = %e, "Summarization failed");
    format!("Error generating summary: {e}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infra::huggingface::HostedSummarizer;
    use crate::normalize::FlightRecord;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct Echo;

    #[async_trait]
    impl Summarizer for Echo {
        async fn summarize(&self, text: &str) -> anyhow::Result<String> {
            Ok(format!("summary of {} chars", text.len()))
        }
    }

    struct Broken;

    #[async_trait]
    impl Summarizer for Broken {
        async fn summarize(&self, _text: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("model is loading"))
        }
    }

    fn row(airline: &str, from: &str, to: &str) -> FlightRecord {
        FlightRecord {
            flight_date: None,
            flight_status: None,
            airline: airline.to_string(),
            flight_number: None,
            from: from.to_string(),
            from_iata: None,
            to: to.to_string(),
            to_iata: None,
            departure_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            arrival_time: None,
        }
    }

    #[test]
    fn test_empty_table_text() {
        assert_eq!(prepare_summary_text(&FlightTable::default()), NO_DATA_TEXT);
    }

    #[test]
    fn test_summary_text_sections() {
        let table = FlightTable::new(vec![
            row("A1", "X", "Y"),
            row("A1", "X", "Y"),
            row("A2", "Y", "Z"),
        ]);
        let text = prepare_summary_text(&table);

        assert!(text.contains("Top Routes: X → Y (2), Y → Z (1)"));
        assert!(text.contains("Top Airlines: A1 (2), A2 (1)"));
        assert!(text.contains("Peak Dates: 2024-01-01 (3)"));
    }

    #[tokio::test]
    async fn test_short_input_skips_model() {
        assert_eq!(generate_insight(&Broken, "  tiny  ").await, NOT_ENOUGH_TEXT);
    }

    #[tokio::test]
    async fn test_failure_becomes_inline_message() {
        let text = "Top Routes: X → Y (2), Y → Z (1)";
        let insight = generate_insight(&Broken, text).await;
        assert_eq!(insight, "Error generating summary: model is loading");
    }

    #[tokio::test]
    async fn test_setup_failure_becomes_inline_message() {
        let config = Config {
            summarizer_token: Some("hf\nabc".to_string()),
            ..Default::default()
        };
        let text = "Top Routes: X → Y (2), Y → Z (1)";

        let insight = generate_insight_with(HostedSummarizer::from_config(&config), text).await;
        assert!(insight.starts_with("Error generating summary: "));
    }

    #[tokio::test]
    async fn test_setup_success_runs_summarizer() {
        let text = "Top Routes: X → Y (2), Y → Z (1)";
        let insight = generate_insight_with(Ok(Echo), text).await;
        assert!(insight.starts_with("summary of"));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let text = "Top Routes: X → Y (2), Y → Z (1)";
        let insight = generate_insight(&Echo, text).await;
        assert!(insight.starts_with("summary of"));
    }
}
