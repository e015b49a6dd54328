//! TUI widgets

pub mod footer;
pub mod help;
pub mod products;
pub mod spinner;
pub mod tabs;
pub mod today;
pub mod yearly;
