//! Storage layer: persisted conflict resolutions keyed by ticker and canonical key.

mod error;
mod json;
mod memory;

pub use error::StoreError;
pub use json::JsonResolutionStore;
pub use memory::MemoryResolutionStore;

use earnguide_merge::Resolution;

/// Where reviewed choices live between runs.
///
/// Rows are unique on `(ticker, fiscal_year, quarter, metric_key)`; saving an
/// existing key replaces its choice. Tickers compare case-insensitively.
pub trait ResolutionStore {
    fn save(&mut self, resolution: Resolution) -> Result<(), StoreError>;

    /// All resolutions recorded for a ticker, in insertion order.
    fn fetch(&self, ticker: &str) -> Result<Vec<Resolution>, StoreError>;
}

pub(crate) fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Insert or replace by row identity.
pub(crate) fn upsert(rows: &mut Vec<Resolution>, mut resolution: Resolution) {
    resolution.ticker = normalize_ticker(&resolution.ticker);
    let same = |r: &Resolution| {
        r.ticker == resolution.ticker
            && r.fiscal_year == resolution.fiscal_year
            && r.quarter == resolution.quarter
            && r.metric_key == resolution.metric_key
    };
    match rows.iter().position(same) {
        Some(i) => rows[i] = resolution,
        None => rows.push(resolution),
    }
}
