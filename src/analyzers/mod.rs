//! Read-only aggregations over the normalized table.
//!
//! Route, airline and date counts feed the charts; the same counts are
//! rendered into a short text for the summarization model.

pub mod aggregate;
pub mod insight;
pub mod types;
