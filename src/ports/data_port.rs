//! Price data access port trait.

use crate::domain::error::VoltrendError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Prices for `symbol` with `start_date <= date <= end_date`.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, VoltrendError>;

    /// First date, last date and number of observations, if any data exists.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, VoltrendError>;
}

impl<P: DataPort + ?Sized> DataPort for &P {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, VoltrendError> {
        (**self).fetch_prices(symbol, start_date, end_date)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, VoltrendError> {
        (**self).get_data_range(symbol)
    }
}
