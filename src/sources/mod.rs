//! Record sources: where production records come from

mod firestore;
mod json_file;

pub use firestore::FirestoreSource;
pub use json_file::JsonFileSource;

use chrono::NaiveDate;

use crate::config::{Config, SourceKind};
use crate::types::{date_key, ProdtrackError, ProductionRecord, Result};

/// Field the store orders results by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    ProductName,
    Date,
}

impl OrderBy {
    /// Stored document field name
    pub fn field(self) -> &'static str {
        match self {
            Self::ProductName => "productName",
            Self::Date => "date",
        }
    }
}

/// The three date-keyed queries against the `productions` collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordQuery {
    /// `date == YYYYMMDD`, ordered by product name
    Day(NaiveDate),
    /// `YYYYMM01 <= date <= YYYYMM31`, ordered by date
    Month { year: i32, month: u32 },
    /// `YYYY0101 <= date <= YYYY1231`, ordered by date
    Year(i32),
}

impl RecordQuery {
    /// Inclusive `(start, end)` date keys
    pub fn bounds(&self) -> (String, String) {
        match *self {
            Self::Day(date) => {
                let key = date_key(date);
                (key.clone(), key)
            }
            Self::Month { year, month } => (
                format!("{:04}{:02}01", year, month),
                format!("{:04}{:02}31", year, month),
            ),
            Self::Year(year) => (format!("{:04}0101", year), format!("{:04}1231", year)),
        }
    }

    pub fn order_by(&self) -> OrderBy {
        match self {
            Self::Day(_) => OrderBy::ProductName,
            Self::Month { .. } | Self::Year(_) => OrderBy::Date,
        }
    }

    /// Whether a `YYYYMMDD` key falls inside this query's range
    pub fn matches(&self, date: &str) -> bool {
        let (start, end) = self.bounds();
        date >= start.as_str() && date <= end.as_str()
    }

    /// Short label for logs and the loading spinner
    pub fn label(&self) -> String {
        match *self {
            Self::Day(date) => date.format("%Y/%m/%d").to_string(),
            Self::Month { year, month } => format!("{}/{:02}", year, month),
            Self::Year(year) => year.to_string(),
        }
    }
}

/// A read-only store of production records
pub trait RecordSource: Send + Sync {
    /// Source name (e.g. "firestore")
    fn name(&self) -> &str;

    /// Fetch the records matching `query`, filtered and ordered by the store
    fn fetch(&self, query: &RecordQuery) -> Result<Vec<ProductionRecord>>;
}

/// Build the configured record source
pub fn from_config(config: &Config) -> Result<Box<dyn RecordSource>> {
    match config.source.kind {
        SourceKind::Firestore => Ok(Box::new(FirestoreSource::new(&config.firebase)?)),
        SourceKind::Json => {
            let dir = config.source.data_dir.clone().ok_or_else(|| {
                ProdtrackError::Config("source.kind = \"json\" requires source.data_dir".into())
            })?;
            Ok(Box::new(JsonFileSource::new(dir)))
        }
    }
}
