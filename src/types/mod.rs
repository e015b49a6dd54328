//! Type definitions for prodtrack

mod error;
mod production;
mod report;

pub use error::*;
pub use production::*;
pub use report::*;
