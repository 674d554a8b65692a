pub mod analyzers;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod infra;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod services;
pub mod session;
