//! Transit performance report generation from trip-level CSV records.

pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod normalize;
pub mod output;
