mod report;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::DataLoaderService;

/// Production quantity reports from the factory's production store
#[derive(Parser)]
#[command(name = "prodtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.prodtrack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Show today's production summary
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show product totals for one day
    Daily(DailyArgs),

    /// Show product totals for one month
    Monthly(MonthlyArgs),

    /// Show the month-by-product matrix for one year
    Yearly(YearlyArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug)]
struct DailyArgs {
    /// Day to report (YYYY-MM-DD or YYYYMMDD, default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct MonthlyArgs {
    /// Year (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Month 1-12 (default: current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct YearlyArgs {
    /// Year (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref()).context("failed to load config")?;

        // The TUI owns the terminal; log lines on stderr would tear the screen
        if !matches!(self.command, None | Some(Commands::Tui)) {
            init_logging(&config.logging.level);
        }

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(&config),
            Some(Commands::Today { json }) => {
                let report = loader(&config)?.today()?;
                emit(&report, json, report::render_today)
            }
            Some(Commands::Daily(args)) => {
                let date = args.date.unwrap_or_else(|| Local::now().date_naive());
                let report = loader(&config)?.daily(date)?;
                emit(&report, args.json, report::render_daily)
            }
            Some(Commands::Monthly(args)) => {
                let today = Local::now().date_naive();
                let year = args.year.unwrap_or(today.year());
                let month = args.month.unwrap_or(today.month());
                let report = loader(&config)?.monthly(year, month)?;
                emit(&report, args.json, report::render_monthly)
            }
            Some(Commands::Yearly(args)) => {
                let year = args.year.unwrap_or(Local::now().year());
                let report = loader(&config)?.yearly(year)?;
                emit(&report, args.json, report::render_yearly)
            }
            Some(Commands::Config) => {
                let file = match &self.config {
                    Some(path) => Some(path.clone()),
                    None => Config::default_path().filter(|p| p.is_file()),
                };
                let file = file.map(|p| p.display().to_string());
                print!(
                    "{}",
                    report::render_config(file.as_deref(), &config.status_rows())
                );
                Ok(())
            }
        }
    }
}

fn loader(config: &Config) -> anyhow::Result<DataLoaderService> {
    DataLoaderService::from_config(config).context("failed to initialize record source")
}

fn emit<T: Serialize>(report: &T, json: bool, render: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render(report));
    }
    Ok(())
}

/// Structured logs to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
