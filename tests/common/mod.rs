#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use voltrend::domain::error::VoltrendError;
use voltrend::domain::pipeline::PipelineConfig;
pub use voltrend::domain::price::{PricePoint, PriceSeries};
use voltrend::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, VoltrendError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(VoltrendError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(points)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, VoltrendError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(VoltrendError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive daily points starting at `start`.
pub fn make_points(start: &str, prices: &[f64]) -> Vec<PricePoint> {
    let start = date(start);
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            price,
        })
        .collect()
}

pub fn make_series(start: &str, prices: &[f64]) -> PriceSeries {
    PriceSeries::new(make_points(start, prices)).unwrap()
}

/// A gently trending, oscillating price path with `n` points.
pub fn generate_prices(n: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            base * (1.0 + 0.002 * t) * (1.0 + 0.03 * (t / 5.0).sin())
        })
        .collect()
}

/// The seven-price scenario used across the end-to-end tests.
pub const E2E_PRICES: [f64; 7] = [100.0, 102.0, 101.0, 105.0, 108.0, 104.0, 110.0];

pub fn e2e_config(horizons: &[usize]) -> PipelineConfig {
    PipelineConfig {
        trend_window: 3,
        vol_window: 3,
        annualization_factor: 252.0,
        target_annual_vol: 0.1,
        max_leverage: 2.0,
        horizons: horizons.iter().copied().collect(),
    }
}

/// Writes `<dir>/<SYMBOL>.csv` with `date,price` rows.
pub fn write_price_csv(dir: &std::path::Path, symbol: &str, points: &[PricePoint]) {
    let mut content = String::from("date,price\n");
    for p in points {
        content.push_str(&format!("{},{}\n", p.date.format("%Y-%m-%d"), p.price));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
