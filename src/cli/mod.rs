//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pivot-signals")]
#[command(author, version, about = "Pivot-breakout signal engine for historical price series")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the signal batch over all (symbol, timeframe) pairs
    Run(RunArgs),
    /// Scan a single pair and print its rows without writing the sink
    Preview(PreviewArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbols to process (comma-separated); all discovered pairs when omitted
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Timeframes to process for the given symbols (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "1d")]
    pub timeframes: Vec<String>,

    /// Data directory with the per-pair CSV files (overrides config)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output CSV path (overrides config)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Worker pool size (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Disable the buy-side trend filter
    #[arg(long)]
    pub no_trend_filter: bool,

    /// Report format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(clap::Args)]
pub struct PreviewArgs {
    /// Symbol to scan
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// Timeframe
    #[arg(short, long, default_value = "1d")]
    pub timeframe: String,

    /// Data directory with the per-pair CSV files (overrides config)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Disable the buy-side trend filter
    #[arg(long)]
    pub no_trend_filter: bool,

    /// Output format (table, json)
    #[arg(long, default_value = "table")]
    pub output: String,
}
