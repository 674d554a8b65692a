//! Concrete clients for the upstream flight API and the summarization model.

pub mod aviationstack;
pub mod huggingface;
