//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod price_store;
pub mod file_config_adapter;
pub mod series_export;
pub mod typst_report;
