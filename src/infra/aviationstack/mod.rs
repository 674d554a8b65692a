mod client;

pub use client::AviationStackClient;
