//! Price observations for a single instrument.

use chrono::NaiveDate;

use super::error::VoltrendError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Ordered, immutable price history.
///
/// Dates are unique and strictly increasing and every price is finite and
/// positive. Gaps between dates are not checked: every computation over a
/// `PriceSeries` is index-relative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, VoltrendError> {
        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(VoltrendError::InvalidSeries {
                    reason: format!("price {} on {} must be positive", point.price, point.date),
                });
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(VoltrendError::InvalidSeries {
                    reason: format!(
                        "dates must be strictly increasing ({} follows {})",
                        point.date,
                        points[i - 1].date
                    ),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Index of `date`, if present.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.date).ok()
    }

    /// `price[i] / price[i-1] - 1` for every consecutive pair, dated at `i`.
    pub fn simple_returns(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .windows(2)
            .map(|w| (w[1].date, w[1].price / w[0].price - 1.0))
            .collect()
    }
}
