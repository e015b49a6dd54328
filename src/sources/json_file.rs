//! Local JSON export source
//!
//! Reads every `*.json` file in a directory. Each file holds a JSON array of
//! records in the store's camelCase shape. Filtering and ordering follow the
//! same rules as the Firestore queries.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::{OrderBy, RecordQuery, RecordSource};
use crate::types::{ProdtrackError, ProductionRecord, Result};

pub struct JsonFileSource {
    data_dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Collect all `*.json` files in the data directory (sorted by path)
    fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.data_dir.join("*.json");
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Parse one export file. Elements that do not decode as a record are
    /// skipped individually; only an unreadable file or a non-array body
    /// fails the whole file.
    fn parse_file(path: &Path) -> Result<Vec<ProductionRecord>> {
        let content = fs::read_to_string(path)?;
        let values: Vec<Value> = serde_json::from_str(&content)
            .map_err(|e| ProdtrackError::Parse(format!("{}: {}", path.display(), e)))?;

        let mut records = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<ProductionRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    file = %path.display(),
                    index,
                    "skipping record: {}",
                    e
                ),
            }
        }
        Ok(records)
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self, query: &RecordQuery) -> Result<Vec<ProductionRecord>> {
        if !self.data_dir.is_dir() {
            return Err(ProdtrackError::Source(format!(
                "data directory not found: {}",
                self.data_dir.display()
            )));
        }

        let mut records: Vec<ProductionRecord> = Vec::new();
        for file in self.collect_files() {
            match Self::parse_file(&file) {
                Ok(parsed) => {
                    records.extend(parsed.into_iter().filter(|r| query.matches(&r.date)))
                }
                Err(e) => tracing::warn!("skipping {}: {}", file.display(), e),
            }
        }

        // Stable sort: equal keys keep file order
        match query.order_by() {
            OrderBy::ProductName => {
                records.sort_by(|a, b| a.product_name.cmp(&b.product_name))
            }
            OrderBy::Date => records.sort_by(|a, b| a.date.cmp(&b.date)),
        }

        tracing::debug!(query = %query.label(), count = records.len(), "read local records");
        Ok(records)
    }
}
