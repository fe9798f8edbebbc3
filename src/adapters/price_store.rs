//! Caller-owned price cache and the caching loader that reads through it.
//!
//! The store lives exactly as long as its owner keeps it; nothing here is
//! process-wide. Entries are keyed by (symbol, start, end).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::VoltrendError;
use crate::domain::price::PriceSeries;
use crate::ports::data_port::DataPort;

type StoreKey = (String, NaiveDate, NaiveDate);

#[derive(Debug, Default)]
pub struct PriceStore {
    entries: RefCell<HashMap<StoreKey, PriceSeries>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Option<PriceSeries> {
        let found = self
            .entries
            .borrow()
            .get(&(symbol.to_string(), start, end))
            .cloned();
        match found {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    pub fn insert(&self, symbol: &str, start: NaiveDate, end: NaiveDate, prices: PriceSeries) {
        self.entries
            .borrow_mut()
            .insert((symbol.to_string(), start, end), prices);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }
}

/// A [`DataPort`] that consults a borrowed [`PriceStore`] before its inner port.
///
/// Failed fetches are not cached.
pub struct CachedDataPort<'s, P: DataPort> {
    inner: P,
    store: &'s PriceStore,
}

impl<'s, P: DataPort> CachedDataPort<'s, P> {
    pub fn new(inner: P, store: &'s PriceStore) -> Self {
        Self { inner, store }
    }
}

impl<P: DataPort> DataPort for CachedDataPort<'_, P> {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, VoltrendError> {
        if let Some(prices) = self.store.get(symbol, start_date, end_date) {
            debug!(symbol, "price store hit");
            return Ok(prices);
        }
        let prices = self.inner.fetch_prices(symbol, start_date, end_date)?;
        self.store.insert(symbol, start_date, end_date, prices.clone());
        Ok(prices)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, VoltrendError> {
        self.inner.get_data_range(symbol)
    }
}
