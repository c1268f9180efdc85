//! In-process resolution store.

use earnguide_merge::Resolution;

use crate::{ResolutionStore, StoreError, normalize_ticker, upsert};

/// Resolutions held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolutionStore {
    rows: Vec<Resolution>,
}

impl MemoryResolutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ResolutionStore for MemoryResolutionStore {
    fn save(&mut self, resolution: Resolution) -> Result<(), StoreError> {
        upsert(&mut self.rows, resolution);
        Ok(())
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<Resolution>, StoreError> {
        let ticker = normalize_ticker(ticker);
        Ok(self.rows.iter().filter(|r| r.ticker == ticker).cloned().collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use earnguide_core::{MergedItem, PeriodType, Source, Unit};

    pub(crate) fn chosen(metric: &str, period: &str, low: f64) -> MergedItem {
        MergedItem {
            metric: metric.into(),
            guidance_value_text: format!("{low}"),
            low_end: Some(low),
            high_end: Some(low),
            units: Unit::Usd,
            period: period.into(),
            period_type: if period.starts_with('Q') {
                PeriodType::Quarter
            } else {
                PeriodType::FullYear
            },
            source: Source::PressRelease,
            filing_date: None,
            context: None,
            provenance: ["press_release".to_string()].into_iter().collect(),
            average: Some(low),
            note: None,
        }
    }

    #[test]
    fn save_and_fetch_by_ticker() {
        let mut store = MemoryResolutionStore::new();
        store.save(Resolution::new("aapl", chosen("revenue", "FY2025", 400.0))).unwrap();
        store.save(Resolution::new("MSFT", chosen("revenue", "FY2025", 250.0))).unwrap();

        let rows = store.fetch("AAPL").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chosen.low_end, Some(400.0));
        assert!(store.fetch("GOOG").unwrap().is_empty());
    }

    #[test]
    fn save_upserts_same_key() {
        let mut store = MemoryResolutionStore::new();
        store.save(Resolution::new("AAPL", chosen("eps", "Q1 FY2024", 1.00))).unwrap();
        store.save(Resolution::new("AAPL", chosen("eps", "Q2 FY2024", 1.10))).unwrap();
        store.save(Resolution::new("aapl", chosen("EPS", "Q1 FY2024", 1.05))).unwrap();

        assert_eq!(store.len(), 2);
        let rows = store.fetch("aapl").unwrap();
        assert_eq!(rows[0].metric_key, "eps|quarter|2024|Q1");
        assert_eq!(rows[0].chosen.low_end, Some(1.05));
    }

    #[test]
    fn ticker_is_normalised_on_save() {
        let mut store = MemoryResolutionStore::new();
        let mut r = Resolution::new("AAPL", chosen("capex", "FY2025", 10.0));
        r.ticker = " aapl ".into();
        store.save(r).unwrap();
        assert_eq!(store.fetch("AAPL").unwrap()[0].ticker, "AAPL");
    }
}
