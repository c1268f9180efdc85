//! Resolution store backed by a single JSON file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use earnguide_merge::Resolution;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{ResolutionStore, StoreError, normalize_ticker, upsert};

/// JSON-file store. The whole file is rewritten on every save, via a temp
/// file in the same directory that is then renamed over the original.
#[derive(Debug, Clone)]
pub struct JsonResolutionStore {
    path: PathBuf,
}

impl JsonResolutionStore {
    /// Open the store at `path`. A missing file is an empty store; an existing
    /// one must parse.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let store = Self {
            path: path.to_path_buf(),
        };
        let count = store.load()?.len();
        debug!(path = %path.display(), count, "opened resolution store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Resolution>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, rows: &[Resolution]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, rows)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(io::Error::from)?;
        Ok(())
    }
}

impl ResolutionStore for JsonResolutionStore {
    fn save(&mut self, resolution: Resolution) -> Result<(), StoreError> {
        let mut rows = self.load()?;
        let key = resolution.metric_key.clone();
        upsert(&mut rows, resolution);
        self.write(&rows)?;
        info!(path = %self.path.display(), metric_key = %key, rows = rows.len(), "saved resolution");
        Ok(())
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<Resolution>, StoreError> {
        let ticker = normalize_ticker(ticker);
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.ticker == ticker)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::chosen;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResolutionStore::open(&dir.path().join("resolutions.json")).unwrap();
        assert!(store.fetch("AAPL").unwrap().is_empty());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("resolutions.json");

        let mut store = JsonResolutionStore::open(&path).unwrap();
        store.save(Resolution::new("aapl", chosen("revenue", "FY2025", 400.0))).unwrap();
        assert!(path.exists());

        let reopened = JsonResolutionStore::open(&path).unwrap();
        let rows = reopened.fetch("AAPL").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "AAPL");
        assert_eq!(rows[0].fiscal_year, 2025);
        assert_eq!(rows[0].metric_key, "revenue|full year|2025|");
        assert_eq!(rows[0].chosen, chosen("revenue", "FY2025", 400.0));
    }

    #[test]
    fn saving_same_key_keeps_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolutions.json");
        let mut store = JsonResolutionStore::open(&path).unwrap();

        store.save(Resolution::new("AAPL", chosen("eps", "Q1 FY2024", 1.00))).unwrap();
        store.save(Resolution::new("AAPL", chosen("eps", "Q1 FY2024", 1.05))).unwrap();
        store.save(Resolution::new("MSFT", chosen("eps", "Q1 FY2024", 2.00))).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let all: Vec<Resolution> = serde_json::from_str(&text).unwrap();
        assert_eq!(all.len(), 2);

        let aapl = store.fetch("AAPL").unwrap();
        assert_eq!(aapl.len(), 1);
        assert_eq!(aapl[0].chosen.low_end, Some(1.05));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolutions.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonResolutionStore::open(&path),
            Err(StoreError::Json(_))
        ));
    }
}
