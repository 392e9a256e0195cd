//! CLI definitions.

pub mod commands;
mod context;

pub use context::AppContext;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxdash")]
#[command(author, version, about = "Terminal forex dashboard with cached rates and analytics")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the config)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level from the command line, or `fallback`.
    pub fn log_level_str<'a>(&self, fallback: &'a str) -> &'a str {
        match self.log_level {
            Some(LogLevel::Trace) => "trace",
            Some(LogLevel::Debug) => "debug",
            Some(LogLevel::Info) => "info",
            Some(LogLevel::Warn) => "warn",
            Some(LogLevel::Error) => "error",
            None => fallback,
        }
    }
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
    /// Show the latest rates
    Latest(LatestArgs),
    /// Convert an amount between two currencies
    Convert(ConvertArgs),
    /// Show a rate history with moving averages and metrics
    Series(SeriesArgs),
    /// Show 24h/7d/30d changes and strength for every currency
    Overview(OverviewArgs),
    /// List supported currencies
    Currencies(CurrenciesArgs),
    /// Export the overview as CSV or JSON
    Export(ExportArgs),
    /// Manage favorite currencies
    Favorites(FavoritesArgs),
    /// Show recent conversions
    History(HistoryArgs),
    /// Live dashboard with auto-refresh
    Watch(WatchArgs),
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

/// Base and symbol selection shared by several commands.
#[derive(clap::Args, Clone)]
pub struct MarketArgs {
    /// Base currency (defaults to dashboard.default_base)
    #[arg(short, long)]
    pub base: Option<String>,

    /// Currencies to show (comma-separated, defaults to dashboard.symbols)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Show every published currency
    #[arg(long, conflicts_with = "symbols")]
    pub all: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct LatestArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Amount to convert
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,

    /// Source currency
    pub from: String,

    /// Target currency
    pub to: String,

    /// Do not record the conversion in the history
    #[arg(long)]
    pub no_save: bool,
}

#[derive(clap::Args)]
pub struct SeriesArgs {
    /// Quoted currency
    pub symbol: String,

    /// Base currency (defaults to dashboard.default_base)
    #[arg(short, long)]
    pub base: Option<String>,

    /// Start date (YYYY-MM-DD), defaults to `days` before the end
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub end: Option<String>,

    /// Length of the default range in days
    #[arg(short, long, default_value = "30")]
    pub days: u64,

    /// Moving average period (defaults to dashboard.ma_period)
    #[arg(long)]
    pub ma_period: Option<usize>,

    /// EMA period (defaults to dashboard.ema_period)
    #[arg(long)]
    pub ema_period: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Sort by strength score instead of currency code
    #[arg(long)]
    pub rank: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct CurrenciesArgs {
    /// Case-insensitive code or name filter
    #[arg(short, long)]
    pub filter: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(clap::Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Case-insensitive code or name filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub action: Option<FavoritesAction>,
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites with their latest rates
    List,
    /// Add a favorite currency
    Add { code: String },
    /// Remove a favorite currency
    Remove { code: String },
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Clear the history
    #[arg(long)]
    pub clear: bool,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Refresh interval in seconds (defaults to dashboard.refresh_interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the built-in default configuration as TOML
    #[arg(long)]
    pub print_default: bool,
}
