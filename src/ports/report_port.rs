//! Report generation port trait.

use std::path::Path;

use crate::domain::error::VoltrendError;
use crate::domain::pipeline::{PipelineConfig, PipelineOutput};
use crate::domain::price::PriceSeries;

/// Everything a presentation adapter may render for one pipeline run.
pub struct ReportData<'a> {
    pub symbol: &'a str,
    pub config: &'a PipelineConfig,
    pub prices: &'a PriceSeries,
    pub output: &'a PipelineOutput,
}

/// Port for writing pipeline output somewhere a human can look at it.
pub trait ReportPort {
    fn write(&self, data: &ReportData<'_>, output_path: &Path) -> Result<(), VoltrendError>;
}
