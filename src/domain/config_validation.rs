//! Configuration loading and validation.
//!
//! Maps the `[strategy]`, `[data]` and `[report]` sections to typed
//! configuration before any computation runs.

use crate::domain::error::VoltrendError;
use crate::domain::pipeline::PipelineConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub symbol: String,
    pub path: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DataConfig {
    /// Requested range, open ends widened to the full calendar.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (
            self.start_date.unwrap_or(NaiveDate::MIN),
            self.end_date.unwrap_or(NaiveDate::MAX),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub output: PathBuf,
    pub series_output: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub regime_table: bool,
}

pub fn build_pipeline_config(config: &dyn ConfigPort) -> Result<PipelineConfig, VoltrendError> {
    let pipeline = PipelineConfig {
        trend_window: required(config, "strategy", "trend_window")?,
        vol_window: required(config, "strategy", "vol_window")?,
        annualization_factor: required(config, "strategy", "annualization_factor")?,
        target_annual_vol: required(config, "strategy", "target_annual_vol")?,
        max_leverage: required(config, "strategy", "max_leverage")?,
        horizons: parse_horizons(&required_string(config, "strategy", "horizons")?)?,
    };
    pipeline.validate()?;
    Ok(pipeline)
}

pub fn build_data_config(config: &dyn ConfigPort) -> Result<DataConfig, VoltrendError> {
    let symbol = required_string(config, "data", "symbol")?.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(VoltrendError::invalid_config("symbol", "must not be empty"));
    }

    let path = config
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "data".to_string());

    let start_date = optional_date(config, "start_date")?;
    let end_date = optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(VoltrendError::invalid_config(
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }

    Ok(DataConfig {
        symbol,
        path: PathBuf::from(path),
        start_date,
        end_date,
    })
}

pub fn build_report_config(config: &dyn ConfigPort) -> ReportConfig {
    let non_empty = |key: &str| {
        config
            .get_string("report", key)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    };
    ReportConfig {
        output: non_empty("output").unwrap_or_else(|| PathBuf::from("report.typ")),
        series_output: non_empty("series_output"),
        template_path: non_empty("template_path"),
        regime_table: config.get_bool("report", "regime_table", true),
    }
}

/// Parse a comma-separated list of horizons, e.g. `21, 63, 252`.
pub fn parse_horizons(value: &str) -> Result<BTreeSet<usize>, VoltrendError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                VoltrendError::invalid_config("horizons", format!("invalid horizon '{}'", s))
            })
        })
        .collect()
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, VoltrendError> {
    config
        .get_string(section, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| VoltrendError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn required<T: FromStr>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<T, VoltrendError> {
    let raw = required_string(config, section, key)?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| VoltrendError::invalid_config(key, format!("cannot parse '{}'", raw.trim())))
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, VoltrendError> {
    match config.get_string("data", key).filter(|s| !s.trim().is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                VoltrendError::invalid_config(key, format!("invalid {} format, expected YYYY-MM-DD", key))
            }),
    }
}
