//! Services for data loading, aggregation and formatting

pub mod aggregator;
pub mod collation;
pub mod data_loader;
pub mod format;

pub use aggregator::Aggregator;
pub use data_loader::DataLoaderService;
pub use format::{format_cell, format_number};
