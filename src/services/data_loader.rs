//! Unified data loading service for CLI and TUI
//!
//! Runs one store query per report, then aggregates. Nothing is cached:
//! every call goes back to the record source.

use chrono::{Local, NaiveDate};

use crate::config::Config;
use crate::services::Aggregator;
use crate::sources::{self, RecordQuery, RecordSource};
use crate::types::{DailyReport, MonthlyReport, Result, YearlyReport};

/// Unified data loading service
pub struct DataLoaderService {
    source: Box<dyn RecordSource>,
}

impl DataLoaderService {
    pub fn new(source: Box<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Build with the record source named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(sources::from_config(config)?))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Product totals for the current local date
    pub fn today(&self) -> Result<DailyReport> {
        self.daily(Local::now().date_naive())
    }

    /// Product totals for one day
    pub fn daily(&self, date: NaiveDate) -> Result<DailyReport> {
        let records = self.source.fetch(&RecordQuery::Day(date))?;
        let items = Aggregator::by_product(&records);
        let total = Aggregator::total(&items);
        Ok(DailyReport::new(date, items, total))
    }

    /// Product totals for one calendar month
    pub fn monthly(&self, year: i32, month: u32) -> Result<MonthlyReport> {
        let records = self.source.fetch(&RecordQuery::Month { year, month })?;
        let items = Aggregator::by_product(&records);
        let total = Aggregator::total(&items);
        Ok(MonthlyReport::new(year, month, items, total))
    }

    /// Month-by-product matrix for one year
    pub fn yearly(&self, year: i32) -> Result<YearlyReport> {
        let records = self.source.fetch(&RecordQuery::Year(year))?;
        let by_month = Aggregator::by_month(&records);
        Ok(YearlyReport::from_monthly(year, &by_month))
    }
}
