pub mod cli;
pub mod config;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;
