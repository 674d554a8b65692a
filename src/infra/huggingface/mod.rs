mod client;

pub use client::{HostedSummarizer, SummaryParameters, SummaryRequest, parse_summary_response};
