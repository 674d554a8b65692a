//! Traits for the external collaborators the dashboard talks to.

pub mod flight_source;
pub mod summarizer;
