//! Plain CSV export of every pipeline series, one row per price date.
//!
//! Columns: `date,price,is_bullish,realized_vol,weight,cumulative_<h>...`.
//! Cells outside a series' domain are left blank.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::error::VoltrendError;
use crate::ports::report_port::{ReportData, ReportPort};

#[derive(Default)]
pub struct CsvSeriesExporter;

impl CsvSeriesExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, data: &ReportData<'_>) -> Result<String, VoltrendError> {
        let out = data.output;
        let regime: HashMap<NaiveDate, bool> =
            out.regime.iter().map(|p| (p.date, p.is_bullish)).collect();
        let vol: HashMap<NaiveDate, f64> =
            out.volatility.iter().map(|p| (p.date, p.realized_vol)).collect();
        let weight: HashMap<NaiveDate, f64> =
            out.positions.iter().map(|p| (p.date, p.weight)).collect();
        let pnl: Vec<(usize, HashMap<NaiveDate, f64>)> = out
            .pnl
            .iter()
            .map(|(h, series)| {
                (
                    *h,
                    series.iter().map(|p| (p.date, p.cumulative_return)).collect(),
                )
            })
            .collect();

        let mut wtr = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            "date".to_string(),
            "price".to_string(),
            "is_bullish".to_string(),
            "realized_vol".to_string(),
            "weight".to_string(),
        ];
        header.extend(pnl.iter().map(|(h, _)| format!("cumulative_{}", h)));
        wtr.write_record(&header).map_err(csv_error)?;

        for point in data.prices.points() {
            let date = point.date;
            let mut row = vec![
                date.format("%Y-%m-%d").to_string(),
                point.price.to_string(),
                regime.get(&date).map(|b| b.to_string()).unwrap_or_default(),
                vol.get(&date).map(|v| v.to_string()).unwrap_or_default(),
                weight.get(&date).map(|w| w.to_string()).unwrap_or_default(),
            ];
            row.extend(
                pnl.iter()
                    .map(|(_, values)| values.get(&date).map(|c| c.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&row).map_err(csv_error)?;
        }

        let bytes = wtr.into_inner().map_err(|e| VoltrendError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| VoltrendError::Data {
            reason: format!("CSV encoding error: {}", e),
        })
    }
}

fn csv_error(e: csv::Error) -> VoltrendError {
    VoltrendError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvSeriesExporter {
    fn write(&self, data: &ReportData<'_>, output_path: &Path) -> Result<(), VoltrendError> {
        let content = self.render(data)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }
}
