//! CSV file price adapter.
//!
//! Reads `<base>/<SYMBOL>.csv` with a `date` column (`YYYY-MM-DD`) and a
//! `price` column, falling back to `close`. Header names are matched
//! case-insensitively.

use crate::domain::error::VoltrendError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PricePoint>, VoltrendError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| VoltrendError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| VoltrendError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_col = find_column(&headers, "date").ok_or_else(|| VoltrendError::Data {
            reason: "missing date column".into(),
        })?;
        let price_col = find_column(&headers, "price")
            .or_else(|| find_column(&headers, "close"))
            .ok_or_else(|| VoltrendError::Data {
                reason: "missing price column".into(),
            })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| VoltrendError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                VoltrendError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let price_str = record.get(price_col).unwrap_or_default().trim();
            if price_str.is_empty() {
                continue;
            }
            let price: f64 = price_str.parse().map_err(|e| VoltrendError::Data {
                reason: format!("invalid price '{}' on {}: {}", price_str, date, e),
            })?;

            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, VoltrendError> {
        let points: Vec<PricePoint> = self
            .read_all(symbol)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();
        debug!(symbol, rows = points.len(), "prices loaded from csv");
        PriceSeries::new(points)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, VoltrendError> {
        let points = self.read_all(symbol)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
