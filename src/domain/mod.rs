//! Core domain types and the pure signal/sizing pipeline.

pub mod price;
pub mod regime;
pub mod volatility;
pub mod sizing;
pub mod pnl;
pub mod metrics;
pub mod pipeline;
pub mod config_validation;
pub mod error;
