//! voltrend — volatility-targeted trend-following signal for a single security.
//!
//! Hexagonal architecture: the pure pipeline in [`domain`], port traits in
//! [`ports`], concrete loaders and renderers in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
